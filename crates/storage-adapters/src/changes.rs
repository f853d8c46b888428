//! Applies a [`Change`] to an owned snapshot.

use domains::{Change, ForumSnapshot};

fn upsert<T, K: PartialEq>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> &K) {
    match items.iter_mut().find(|existing| key(existing) == key(&item)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

pub(crate) fn apply(snapshot: &mut ForumSnapshot, change: Change) {
    match change {
        Change::ServerSaved(server) => upsert(&mut snapshot.servers, server, |s| &s.id),
        Change::ServerRemoved(id) => snapshot.servers.retain(|s| s.id != id),
        Change::CategorySaved(category) => {
            upsert(&mut snapshot.categories, category, |c| &c.id)
        }
        Change::CategoryRemoved(id) => snapshot.categories.retain(|c| c.id != id),
        Change::ThreadSaved(thread) => upsert(&mut snapshot.threads, thread, |t| &t.id),
        Change::ThreadRemoved(id) => snapshot.threads.retain(|t| t.id != id),
        Change::UserSaved(user) => upsert(&mut snapshot.users, user, |u| &u.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{Server, ServerId};

    fn server(id: &str, name: &str) -> Server {
        Server {
            id: ServerId::from(id),
            name: name.into(),
            description: "The primary server for all discussions.".into(),
        }
    }

    #[test]
    fn saved_replaces_in_place_and_removed_drops() {
        let mut snapshot = ForumSnapshot::default();
        apply(&mut snapshot, Change::ServerSaved(server("server1", "Main")));
        apply(&mut snapshot, Change::ServerSaved(server("server2", "Roleplay Hub")));
        apply(&mut snapshot, Change::ServerSaved(server("server1", "Main GTA5 Server")));

        assert_eq!(snapshot.servers.len(), 2);
        assert_eq!(snapshot.servers[0].name, "Main GTA5 Server");

        apply(&mut snapshot, Change::ServerRemoved(ServerId::from("server1")));
        assert_eq!(snapshot.servers.len(), 1);
        assert_eq!(snapshot.servers[0].id, ServerId::from("server2"));
    }
}
