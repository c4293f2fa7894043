//! Repository Integration Tests
//!
//! Tests for the node, user and client repositories with an in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::domain::{ClientAssignment, DomainError, Node, NodeClient, User};
    use crate::repository::{
        init_db, ClientAssignmentOperations, ClientOrderingOperations, NodeClientRepository,
        NodeRepository, Repository, SharedConnection, UserRepository,
    };
    use std::path::Path;
    use std::sync::Arc;

    struct Fixture {
        conn: SharedConnection,
        nodes: NodeRepository,
        users: UserRepository,
        clients: NodeClientRepository,
    }

    async fn setup_test_db() -> Fixture {
        // Use in-memory database for tests
        let db_state = init_db(Path::new(":memory:")).await.expect("Failed to init test DB");
        Fixture {
            conn: db_state.conn.clone(),
            nodes: NodeRepository::new(db_state.conn.clone()),
            users: UserRepository::new(db_state.conn.clone()),
            clients: NodeClientRepository::new(db_state.conn.clone()),
        }
    }

    async fn user(fx: &Fixture, name: &str) -> u32 {
        fx.users.create(&User::new(0, name.to_string())).await.unwrap().id
    }

    async fn node(fx: &Fixture, name: &str) -> u32 {
        fx.nodes.create(&Node::new(0, name.to_string())).await.unwrap().id
    }

    async fn client_for(fx: &Fixture, node_id: u32, name: &str, user_id: u32) -> u32 {
        fx.clients
            .create_for_user(&NodeClient::new(0, node_id, name.to_string()), user_id, true)
            .await
            .unwrap()
            .id
    }

    async fn exec(fx: &Fixture, sql: &str) {
        let guard = fx.conn.lock().await;
        guard.as_ref().unwrap().execute_batch(sql).unwrap();
    }

    fn orders(assignments: &[ClientAssignment]) -> Vec<(u32, i32)> {
        let mut pairs: Vec<(u32, i32)> = assignments.iter().map(|a| (a.client_id, a.order)).collect();
        pairs.sort();
        pairs
    }

    #[tokio::test]
    async fn test_node_crud() {
        let fx = setup_test_db().await;

        let created = fx.nodes.create(&Node::new(0, "  edge-1 ".to_string())).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.name, "edge-1");

        let mut renamed = created.clone();
        renamed.address = Some("10.0.0.1".to_string());
        fx.nodes.update(&renamed).await.unwrap();

        let found = fx.nodes.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.address.as_deref(), Some("10.0.0.1"));

        fx.nodes.delete(created.id).await.unwrap();
        assert!(fx.nodes.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_node_name_required() {
        let fx = setup_test_db().await;
        let err = fx.nodes.create(&Node::new(0, "   ".to_string())).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_nodes_listed_by_pinyin() {
        let fx = setup_test_db().await;
        node(&fx, "香港").await;
        node(&fx, "Amsterdam").await;
        node(&fx, "北京").await;

        let names: Vec<String> = fx.nodes.list().await.unwrap().into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["Amsterdam", "北京", "香港"]);
    }

    #[tokio::test]
    async fn test_new_assignments_follow_insertion_order() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let n = node(&fx, "edge").await;

        let x = client_for(&fx, n, "x", u).await;
        let y = client_for(&fx, n, "y", u).await;
        let z = client_for(&fx, n, "z", u).await;

        let assignments = fx.clients.assignments_for_user(u).await.unwrap();
        assert_eq!(orders(&assignments), vec![(x, 0), (y, 1), (z, 2)]);
    }

    #[tokio::test]
    async fn test_bulk_set_order_commits_positions() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let n = node(&fx, "edge").await;
        let x = client_for(&fx, n, "x", u).await;
        let y = client_for(&fx, n, "y", u).await;
        let z = client_for(&fx, n, "z", u).await;

        // {X:2, Y:0, Z:1}
        fx.clients.set_assignment_order(x, u, 2).await.unwrap();
        fx.clients.set_assignment_order(y, u, 0).await.unwrap();
        fx.clients.set_assignment_order(z, u, 1).await.unwrap();

        let committed = fx.clients.bulk_set_order(u, &[z, x, y]).await.unwrap();
        let in_order: Vec<u32> = committed.iter().map(|a| a.client_id).collect();
        assert_eq!(in_order, vec![z, x, y]);

        let stored = fx.clients.assignments_for_user(u).await.unwrap();
        let mut expected = vec![(z, 0), (x, 1), (y, 2)];
        expected.sort();
        assert_eq!(orders(&stored), expected);
    }

    #[tokio::test]
    async fn test_bulk_set_order_leaves_other_users_untouched() {
        let fx = setup_test_db().await;
        let a = user(&fx, "alice").await;
        let b = user(&fx, "bob").await;
        let n = node(&fx, "edge").await;

        let x = client_for(&fx, n, "x", a).await;
        let y = client_for(&fx, n, "y", a).await;
        fx.clients.assign_client(y, b, false).await.unwrap();
        fx.clients.assign_client(x, b, true).await.unwrap();
        fx.clients.set_assignment_order(x, b, 7).await.unwrap();

        let before_b = fx.clients.assignments_for_user(b).await.unwrap();
        fx.clients.bulk_set_order(a, &[y, x]).await.unwrap();
        let after_b = fx.clients.assignments_for_user(b).await.unwrap();

        assert_eq!(before_b, after_b);
        assert_eq!(orders(&after_b), vec![(x, 7), (y, 0)]);
    }

    #[tokio::test]
    async fn test_invalid_permutation_rejected_without_writes() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let n = node(&fx, "edge").await;
        let x = client_for(&fx, n, "x", u).await;
        let y = client_for(&fx, n, "y", u).await;
        fx.clients.set_assignment_order(x, u, 5).await.unwrap();

        let before = fx.clients.assignments_for_user(u).await.unwrap();

        // Duplicate
        let err = fx.clients.bulk_set_order(u, &[y, y]).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // Missing one
        let err = fx.clients.bulk_set_order(u, &[x]).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // Client not assigned to this user
        let other = fx.clients.create(&NodeClient::new(0, n, "loose".to_string())).await.unwrap();
        let err = fx.clients.bulk_set_order(u, &[x, y, other.id]).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert_eq!(fx.clients.assignments_for_user(u).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_bulk_set_order_unknown_user() {
        let fx = setup_test_db().await;
        let err = fx.clients.bulk_set_order(42, &[]).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deleting_client_keeps_gaps() {
        let fx = setup_test_db().await;
        let a = user(&fx, "alice").await;
        let b = user(&fx, "bob").await;
        let n = node(&fx, "edge").await;

        let x = client_for(&fx, n, "x", a).await;
        let y = client_for(&fx, n, "y", a).await;
        let z = client_for(&fx, n, "z", a).await;
        fx.clients.assign_client(y, b, true).await.unwrap();
        fx.clients.assign_client(z, b, true).await.unwrap();

        fx.clients.delete(y).await.unwrap();

        assert_eq!(orders(&fx.clients.assignments_for_user(a).await.unwrap()), vec![(x, 0), (z, 2)]);
        assert_eq!(orders(&fx.clients.assignments_for_user(b).await.unwrap()), vec![(z, 1)]);
        assert!(fx.clients.find_by_id(y).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_node_cascades() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let keep = node(&fx, "keep").await;
        let gone = node(&fx, "gone").await;

        let kept = client_for(&fx, keep, "kept", u).await;
        client_for(&fx, gone, "lost", u).await;

        fx.nodes.delete(gone).await.unwrap();

        let remaining = fx.clients.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept);
        assert_eq!(fx.clients.assignments_for_user(u).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_node() {
        let fx = setup_test_db().await;
        let err = fx.nodes.delete(99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_assign_twice_conflicts() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let n = node(&fx, "edge").await;
        let x = client_for(&fx, n, "x", u).await;

        let err = fx.clients.assign_client(x, u, true).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_set_enabled_and_unassign() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let n = node(&fx, "edge").await;
        let x = client_for(&fx, n, "x", u).await;

        let updated = fx.clients.set_assignment_enabled(x, u, false).await.unwrap();
        assert!(!updated.enable);
        assert_eq!(updated.order, 0);

        fx.clients.unassign_client(x, u).await.unwrap();
        assert!(fx.clients.list_for_user(u).await.unwrap().is_empty());

        let err = fx.clients.set_assignment_enabled(x, u, true).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_for_user_carries_all_assignments() {
        let fx = setup_test_db().await;
        let a = user(&fx, "alice").await;
        let b = user(&fx, "bob").await;
        let n = node(&fx, "edge").await;
        let x = client_for(&fx, n, "x", a).await;
        fx.clients.assign_client(x, b, false).await.unwrap();
        client_for(&fx, n, "only-bob", b).await;

        let listed = fx.clients.list_for_user(a).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].users.len(), 2);
        assert_eq!(listed[0].assignment_for(b).map(|s| s.enable), Some(false));
    }

    #[tokio::test]
    async fn test_list_with_clients_groups_by_node() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let first = node(&fx, "a-node").await;
        let second = node(&fx, "b-node").await;
        client_for(&fx, first, "one", u).await;
        client_for(&fx, first, "two", u).await;
        client_for(&fx, second, "three", u).await;

        let listed = fx.nodes.list_with_clients().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].items.len(), 2);
        assert_eq!(listed[1].items.len(), 1);
        assert_eq!(listed[1].items[0].users[0].user_id, u);
    }

    #[tokio::test]
    async fn test_client_requires_existing_node() {
        let fx = setup_test_db().await;
        let err = fx.clients.create(&NodeClient::new(0, 404, "x".to_string())).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deleting_user_drops_assignments() {
        let fx = setup_test_db().await;
        let a = user(&fx, "alice").await;
        let n = node(&fx, "edge").await;
        let x = client_for(&fx, n, "x", a).await;

        fx.users.delete(a).await.unwrap();

        let client = fx.clients.find_by_id(x).await.unwrap().unwrap();
        assert!(client.users.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_user_name_conflicts() {
        let fx = setup_test_db().await;
        user(&fx, "alice").await;
        let err = fx.users.create(&User::new(0, "alice".to_string())).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_bulk_set_order_rolls_back_on_storage_fault() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let n = node(&fx, "edge").await;
        let x = client_for(&fx, n, "x", u).await;
        let y = client_for(&fx, n, "y", u).await;
        let z = client_for(&fx, n, "z", u).await;

        let before = fx.clients.assignments_for_user(u).await.unwrap();

        // Fail the last row of the batch, after the first two were updated
        exec(
            &fx,
            &format!(
                "CREATE TRIGGER fail_reorder BEFORE UPDATE OF sort_order ON client_users
                 WHEN NEW.client_id = {} BEGIN SELECT RAISE(ABORT, 'disk'); END;",
                y
            ),
        )
        .await;

        let err = fx.clients.bulk_set_order(u, &[z, x, y]).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert_eq!(fx.clients.assignments_for_user(u).await.unwrap(), before);

        exec(&fx, "DROP TRIGGER fail_reorder;").await;
        fx.clients.bulk_set_order(u, &[z, x, y]).await.unwrap();
        assert_eq!(orders(&fx.clients.assignments_for_user(u).await.unwrap()), vec![(x, 1), (y, 2), (z, 0)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_bulk_reorders_keep_one_whole_order() {
        let fx = setup_test_db().await;
        let u = user(&fx, "alice").await;
        let n = node(&fx, "edge").await;
        let mut forward = Vec::new();
        for i in 0..20 {
            forward.push(client_for(&fx, n, &format!("c{}", i), u).await);
        }
        let backward: Vec<u32> = forward.iter().rev().copied().collect();

        let clients = Arc::new(fx.clients);
        let mut handles = Vec::new();
        for i in 0..50 {
            let clients = clients.clone();
            let order = if i % 2 == 0 { forward.clone() } else { backward.clone() };
            handles.push(tokio::spawn(async move { clients.bulk_set_order(u, &order).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = clients.assignments_for_user(u).await.unwrap();
        let stored_orders: Vec<i32> = stored.iter().map(|a| a.order).collect();
        assert_eq!(stored_orders, (0..20).collect::<Vec<_>>());
        let sequence: Vec<u32> = stored.iter().map(|a| a.client_id).collect();
        assert!(sequence == forward || sequence == backward);
    }

    #[tokio::test]
    async fn test_row_id_beyond_u32_is_a_storage_error() {
        let fx = setup_test_db().await;
        exec(&fx, "INSERT INTO nodes (id, name, updated_at) VALUES (4294967296, 'far', 0);").await;

        let err = fx.nodes.create(&Node::new(0, "next".to_string())).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
