//! Server and category management. Admin only.

use super::ForumStore;
use crate::guard::{self, require};
use crate::ids::generate_id;
use crate::validation;
use domains::{
    Category, CategoryId, CategoryPatch, CategoryStats, Change, EntityKind, ForumError, NewCategory,
    NewServer, Result, Server, ServerId, ServerPatch, User,
};

impl ForumStore {
    pub fn create_server(&mut self, actor: &User, input: NewServer) -> Result<Server> {
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can create servers")?;
        validation::SERVER_NAME.check(&input.name)?;
        validation::SERVER_DESCRIPTION.check(&input.description)?;

        let server = Server {
            id: ServerId::new(generate_id(EntityKind::Server, self.now())),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
        };
        self.servers.insert(server.id.clone(), server.clone());
        self.emit(Change::ServerSaved(server.clone()));
        tracing::info!(server_id = %server.id, name = %server.name, "server created");
        Ok(server)
    }

    pub fn update_server(&mut self, actor: &User, id: &ServerId, patch: ServerPatch) -> Result<Server> {
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can edit servers")?;
        if let Some(name) = &patch.name {
            validation::SERVER_NAME.check(name)?;
        }
        if let Some(description) = &patch.description {
            validation::SERVER_DESCRIPTION.check(description)?;
        }

        let server = self
            .servers
            .get_mut(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Server, id))?;
        if let Some(name) = patch.name {
            server.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            server.description = description.trim().to_string();
        }
        let server = server.clone();
        self.emit(Change::ServerSaved(server.clone()));
        tracing::info!(server_id = %id, "server updated");
        Ok(server)
    }

    /// Rejected with `DeletionBlocked` while any category still belongs to it.
    pub fn delete_server(&mut self, actor: &User, id: &ServerId) -> Result<Server> {
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can delete servers")?;
        self.get_server(id)?;
        self.can_delete_server(id).into_result()?;

        let server = self
            .servers
            .remove(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Server, id))?;
        self.emit(Change::ServerRemoved(id.clone()));
        tracing::info!(server_id = %id, name = %server.name, "server deleted");
        Ok(server)
    }

    pub fn create_category(&mut self, actor: &User, input: NewCategory) -> Result<Category> {
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can create categories")?;
        validation::CATEGORY_NAME.check(&input.name)?;
        validation::CATEGORY_DESCRIPTION.check(&input.description)?;
        self.get_server(&input.server_id)?;

        let category = Category {
            id: CategoryId::new(generate_id(EntityKind::Category, self.now())),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            icon: input.icon.filter(|i| !i.trim().is_empty()),
            server_id: input.server_id,
            stats: CategoryStats::default(),
        };
        self.categories.insert(category.id.clone(), category.clone());
        self.emit(Change::CategorySaved(category.clone()));
        tracing::info!(
            category_id = %category.id,
            server_id = %category.server_id,
            name = %category.name,
            "category created"
        );
        Ok(category)
    }

    /// Shallow merge; id, owning server and counters are never touched.
    pub fn update_category(
        &mut self,
        actor: &User,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category> {
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can edit categories")?;
        if let Some(name) = &patch.name {
            validation::CATEGORY_NAME.check(name)?;
        }
        if let Some(description) = &patch.description {
            validation::CATEGORY_DESCRIPTION.check(description)?;
        }

        let category = self
            .categories
            .get_mut(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Category, id))?;
        if let Some(name) = patch.name {
            category.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            category.description = description.trim().to_string();
        }
        if let Some(icon) = patch.icon {
            category.icon = icon.filter(|i| !i.trim().is_empty());
        }
        let category = category.clone();
        self.emit(Change::CategorySaved(category.clone()));
        tracing::info!(category_id = %id, "category updated");
        Ok(category)
    }

    /// Rejected with `DeletionBlocked` while any thread still belongs to it.
    pub fn delete_category(&mut self, actor: &User, id: &CategoryId) -> Result<Category> {
        let actor = self.resolve_actor(actor)?;
        require(guard::can_manage_forum(&actor), "only administrators can delete categories")?;
        self.get_category(id)?;
        self.can_delete_category(id).into_result()?;

        let category = self
            .categories
            .remove(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Category, id))?;
        self.emit(Change::CategoryRemoved(id.clone()));
        tracing::info!(category_id = %id, name = %category.name, "category deleted");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use domains::{CategoryPatch, EntityKind, ForumError, NewCategory, NewServer, ServerId, ServerPatch};

    #[test]
    fn non_admins_cannot_touch_structure() {
        let (mut store, _, category) = store();
        let err = store
            .create_server(
                &franklin(),
                NewServer { name: "Franklin's Hub".into(), description: "Not allowed to exist.".into() },
            )
            .unwrap_err();
        assert!(matches!(err, ForumError::PermissionDenied(_)));
        assert!(store.delete_category(&franklin(), &category).is_err());
        assert_eq!(store.list_servers().len(), 1);
    }

    #[test]
    fn server_with_categories_cannot_be_deleted() {
        let (mut store, _, category) = store();
        let server_id = store.get_category(&category).unwrap().server_id.clone();
        let before = store.snapshot();

        let err = store.delete_server(&admin(), &server_id).unwrap_err();
        assert_eq!(err.blocking_children(), Some(1));
        assert!(matches!(err, ForumError::DeletionBlocked { kind: EntityKind::Server, .. }));
        assert_eq!(store.snapshot().servers, before.servers);

        store.delete_category(&admin(), &category).unwrap();
        assert!(store.can_delete_server(&server_id).is_allowed());
        store.delete_server(&admin(), &server_id).unwrap();
        assert!(store.list_servers().is_empty());
    }

    #[test]
    fn category_with_threads_cannot_be_deleted() {
        let (mut store, _, category) = store();
        open_thread(&mut store, &franklin(), &category);
        open_thread(&mut store, &franklin(), &category);
        let err = store.delete_category(&admin(), &category).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("category {category} cannot be deleted: contains 2 threads")
        );
        assert!(store.get_category(&category).is_ok());
    }

    #[test]
    fn category_needs_existing_server() {
        let (mut store, _, _) = store();
        let err = store
            .create_category(
                &admin(),
                NewCategory {
                    name: "Orphans".into(),
                    description: "Belongs to nothing at all.".into(),
                    icon: None,
                    server_id: ServerId::from("server9"),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ForumError::NotFound { kind: EntityKind::Server, .. }));
    }

    #[test]
    fn updates_merge_and_keep_identity() {
        let (mut store, _, category) = store();
        open_thread(&mut store, &franklin(), &category);
        let before = store.get_category(&category).unwrap().clone();

        let updated = store
            .update_category(
                &admin(),
                &category,
                CategoryPatch { name: Some("  RP Lounge ".into()), icon: Some(None), ..Default::default() },
            )
            .unwrap();
        assert_eq!(updated.name, "RP Lounge");
        assert_eq!(updated.icon, None);
        assert_eq!(updated.description, before.description);
        assert_eq!(updated.server_id, before.server_id);
        assert_eq!(updated.stats, before.stats);

        let server = store
            .update_server(&admin(), &before.server_id, ServerPatch { description: Some("Roleplay all day long.".into()), ..Default::default() })
            .unwrap();
        assert_eq!(server.name, "Roleplay Hub");
        assert!(store
            .update_server(&admin(), &before.server_id, ServerPatch { name: Some("x".into()), ..Default::default() })
            .is_err());
    }
}
