//! Registration, bans and roles.

use super::ForumStore;
use crate::guard::{self, require};
use crate::ids::generate_id;
use crate::validation;
use chrono::{DateTime, Utc};
use domains::{Change, EntityKind, ForumError, Result, User, UserId};

impl ForumStore {
    /// Adds a regular member. Usernames are unique ignoring case.
    pub fn register_user(&mut self, username: &str, email: Option<&str>) -> Result<User> {
        validation::USERNAME.check(username)?;
        if let Some(email) = email {
            validation::check_email(email)?;
        }
        let username = username.trim();
        if self
            .users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(username))
        {
            return Err(ForumError::validation("username", "already taken"));
        }

        let now = self.now();
        let user = User {
            id: UserId::new(generate_id(EntityKind::User, now)),
            username: username.to_string(),
            email: email.map(|e| e.trim().to_string()),
            is_admin: false,
            is_banned: false,
            ban_end_date: None,
        };
        self.users.insert(user.id.clone(), user.clone());
        self.emit(Change::UserSaved(user.clone()));
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Bans for the configured default duration.
    pub fn ban_user(&mut self, actor: &User, id: &UserId) -> Result<User> {
        let until = self.now() + self.options.ban_duration;
        self.ban_user_until(actor, id, until)
    }

    pub fn ban_user_until(
        &mut self,
        actor: &User,
        id: &UserId,
        until: DateTime<Utc>,
    ) -> Result<User> {
        self.get_user(id)?;
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can ban users")?;
        require(&actor.id != id, "administrators cannot ban themselves")?;
        if until <= self.now() {
            return Err(ForumError::validation("banEndDate", "must be in the future"));
        }

        let user = self.user_mut(id)?;
        user.is_banned = true;
        user.ban_end_date = Some(until);
        let user = user.clone();
        self.emit(Change::UserSaved(user.clone()));
        tracing::info!(user_id = %id, until = %until, actor = %actor.id, "user banned");
        Ok(user)
    }

    pub fn unban_user(&mut self, actor: &User, id: &UserId) -> Result<User> {
        self.get_user(id)?;
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can unban users")?;

        let user = self.user_mut(id)?;
        user.is_banned = false;
        user.ban_end_date = None;
        let user = user.clone();
        self.emit(Change::UserSaved(user.clone()));
        tracing::info!(user_id = %id, actor = %actor.id, "user unbanned");
        Ok(user)
    }

    /// Grants or revokes the admin role. Admins cannot demote themselves.
    pub fn set_admin(&mut self, actor: &User, id: &UserId, is_admin: bool) -> Result<User> {
        self.get_user(id)?;
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can change roles")?;
        require(
            is_admin || &actor.id != id,
            "administrators cannot revoke their own role",
        )?;

        let user = self.user_mut(id)?;
        user.is_admin = is_admin;
        let user = user.clone();
        self.emit(Change::UserSaved(user.clone()));
        tracing::info!(user_id = %id, is_admin, actor = %actor.id, "user role changed");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::StoreOptions;
    use chrono::Duration;
    use domains::{ForumError, NewThread, UserId};

    #[test]
    fn default_ban_lasts_thirty_days_and_unban_clears_it() {
        let (mut store, clock, _) = store();
        let at = clock.peek();
        let banned = store.ban_user(&admin(), &lester().id).unwrap();
        assert!(banned.is_banned);
        assert_eq!(banned.ban_end_date, Some(at + Duration::days(30)));

        let cleared = store.unban_user(&admin(), &lester().id).unwrap();
        assert!(!cleared.is_banned);
        assert_eq!(cleared.ban_end_date, None);
    }

    #[test]
    fn ban_duration_follows_options() {
        let (store, clock, _) = store();
        let mut store = store.with_options(StoreOptions { ban_duration: Duration::days(7) });
        let at = clock.peek();
        let banned = store.ban_user(&admin(), &lester().id).unwrap();
        assert_eq!(banned.ban_end_date, Some(at + Duration::days(7)));
    }

    #[test]
    fn ban_rules() {
        let (mut store, clock, _) = store();
        assert!(matches!(
            store.ban_user(&franklin(), &lester().id),
            Err(ForumError::PermissionDenied(_))
        ));
        assert!(store.ban_user(&admin(), &admin().id).is_err());
        assert!(matches!(
            store.ban_user_until(&admin(), &lester().id, clock.peek() - Duration::days(1)),
            Err(ForumError::ValidationFailed { .. })
        ));
        assert!(matches!(
            store.ban_user(&admin(), &UserId::from("ghost")),
            Err(ForumError::NotFound { .. })
        ));
        assert!(!store.get_user(&lester().id).unwrap().is_banned);
    }

    #[test]
    fn banned_member_cannot_reply_until_ban_expires() {
        let (mut store, clock, category) = store();
        let thread = open_thread(&mut store, &franklin(), &category);
        let until = clock.peek() + Duration::hours(1);
        let banned = store.ban_user_until(&admin(), &lester().id, until).unwrap();

        assert!(store.add_post(&banned, &thread.id, "Can I still post here?").is_err());
        clock.advance(Duration::hours(2));
        assert!(store.add_post(&banned, &thread.id, "Back after my ban ended.").is_ok());
        assert!(store
            .create_thread(
                &banned,
                &category,
                NewThread {
                    title: "Returning player".into(),
                    content: "Back again and looking for a crew to join.".into(),
                },
            )
            .is_ok());
    }

    #[test]
    fn demoted_admin_cannot_ban_with_an_old_handle() {
        let (mut store, _, _) = store();
        let promoted = store.set_admin(&admin(), &franklin().id, true).unwrap();
        store.set_admin(&admin(), &franklin().id, false).unwrap();
        assert!(matches!(
            store.ban_user(&promoted, &lester().id),
            Err(ForumError::PermissionDenied(_))
        ));
        assert!(!store.get_user(&lester().id).unwrap().is_banned);
    }

    #[test]
    fn registration_validates_and_rejects_duplicates() {
        let (mut store, _, _) = store();
        let user = store.register_user("  TrevorPhilips ", Some("trevor@example.com")).unwrap();
        assert_eq!(user.username, "TrevorPhilips");
        assert!(!user.is_admin);
        assert!(user.id.as_str().starts_with("user-"));

        assert!(store.register_user("trevorphilips", None).is_err());
        assert!(store.register_user("ab", None).is_err());
        assert!(store.register_user("Lamar", Some("nope")).is_err());
        assert!(store.register_user("Lamar", None).is_ok());
    }

    #[test]
    fn roles_are_admin_managed() {
        let (mut store, _, _) = store();
        assert!(store.set_admin(&franklin(), &franklin().id, true).is_err());
        let promoted = store.set_admin(&admin(), &lester().id, true).unwrap();
        assert!(promoted.is_admin);
        assert!(store.set_admin(&admin(), &admin().id, false).is_err());
        assert!(!store.set_admin(&promoted, &admin().id, false).unwrap().is_admin);
    }
}
