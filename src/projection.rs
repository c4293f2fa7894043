//! Per-User Projection
//!
//! Derives the display sequence of one user's clients from the stored
//! per-user order. The `virtual_order` attached here is a display rank only;
//! nothing in this module talks to the backend.

use crate::models::{ClientAssignment, NodeClient};

/// One row of the user node client table
#[derive(Debug, Clone, PartialEq)]
pub struct UserClientRow {
    pub client: NodeClient,
    /// This user's assignment of `client`
    pub assignment: ClientAssignment,
    /// Zero-based position in the projected sequence
    pub virtual_order: usize,
}

/// Clients assigned to `user_id`, ascending by that user's order.
///
/// Clients without an assignment for the user are skipped. Equal orders keep
/// their input order.
pub fn project_for_user(clients: &[NodeClient], user_id: u32) -> Vec<UserClientRow> {
    let mut assigned: Vec<(&NodeClient, &ClientAssignment)> = clients
        .iter()
        .filter_map(|client| client.assignment_for(user_id).map(|a| (client, a)))
        .collect();

    // sort_by_key is stable
    assigned.sort_by_key(|(_, assignment)| assignment.order);

    assigned
        .into_iter()
        .enumerate()
        .map(|(index, (client, assignment))| UserClientRow {
            client: client.clone(),
            assignment: assignment.clone(),
            virtual_order: index,
        })
        .collect()
}

/// Client ids in projected order, the starting point of a reorder
pub fn projected_ids(rows: &[UserClientRow]) -> Vec<u32> {
    rows.iter().map(|row| row.client.id).collect()
}

/// Swap the entry at `index` with its predecessor
pub fn move_up(order: &mut [u32], index: usize) {
    if index > 0 && index < order.len() {
        order.swap(index - 1, index);
    }
}

/// Swap the entry at `index` with its successor
pub fn move_down(order: &mut [u32], index: usize) {
    if index + 1 < order.len() {
        order.swap(index, index + 1);
    }
}

/// Write committed assignments back into the cached client list.
///
/// Only rows of the committing user change.
pub fn apply_committed(clients: &mut [NodeClient], committed: &[ClientAssignment]) {
    for assignment in committed {
        let Some(client) = clients.iter_mut().find(|c| c.id == assignment.client_id) else {
            continue;
        };
        if let Some(slot) = client.users.iter_mut().find(|a| a.user_id == assignment.user_id) {
            *slot = assignment.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U: u32 = 1;
    const OTHER: u32 = 2;

    fn client(id: u32, orders: &[(u32, i32)]) -> NodeClient {
        NodeClient {
            id,
            node_id: 1,
            name: format!("client-{}", id),
            users: orders
                .iter()
                .map(|(user_id, order)| ClientAssignment {
                    client_id: id,
                    user_id: *user_id,
                    enable: true,
                    order: *order,
                })
                .collect(),
        }
    }

    fn ids(rows: &[UserClientRow]) -> Vec<u32> {
        rows.iter().map(|r| r.client.id).collect()
    }

    #[test]
    fn test_projects_by_user_order() {
        // X=10, Y=20, Z=30 with {X:2, Y:0, Z:1}
        let clients = vec![client(10, &[(U, 2)]), client(20, &[(U, 0)]), client(30, &[(U, 1)])];

        let rows = project_for_user(&clients, U);
        assert_eq!(ids(&rows), vec![20, 30, 10]);
        assert_eq!(rows.iter().map(|r| r.virtual_order).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let clients = vec![client(3, &[(U, 1)]), client(1, &[(U, 0)]), client(2, &[(U, 1)]), client(4, &[(U, 1)])];

        assert_eq!(ids(&project_for_user(&clients, U)), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_virtual_order_is_dense_over_sparse_orders() {
        let clients = vec![client(1, &[(U, 40)]), client(2, &[(U, -3)]), client(3, &[(U, 900)])];

        let rows = project_for_user(&clients, U);
        assert_eq!(ids(&rows), vec![2, 1, 3]);
        assert_eq!(rows.iter().map(|r| r.virtual_order).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unassigned_clients_are_skipped() {
        let clients = vec![client(1, &[(OTHER, 0)]), client(2, &[(U, 5), (OTHER, 1)]), client(3, &[])];

        let rows = project_for_user(&clients, U);
        assert_eq!(ids(&rows), vec![2]);
        assert_eq!(rows[0].assignment.order, 5);
        assert!(project_for_user(&clients, 99).is_empty());
    }

    #[test]
    fn test_projection_uses_only_the_given_user() {
        let clients = vec![client(1, &[(U, 1), (OTHER, 0)]), client(2, &[(U, 0), (OTHER, 1)])];

        assert_eq!(ids(&project_for_user(&clients, U)), vec![2, 1]);
        assert_eq!(ids(&project_for_user(&clients, OTHER)), vec![1, 2]);
    }

    #[test]
    fn test_move_helpers() {
        let mut order = vec![1, 2, 3];
        move_up(&mut order, 2);
        assert_eq!(order, vec![1, 3, 2]);
        move_down(&mut order, 0);
        assert_eq!(order, vec![3, 1, 2]);
        move_up(&mut order, 0);
        move_down(&mut order, 2);
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_apply_committed_touches_only_that_user() {
        let mut clients = vec![client(1, &[(U, 0), (OTHER, 4)]), client(2, &[(U, 1), (OTHER, 2)])];
        let committed = vec![
            ClientAssignment { client_id: 2, user_id: U, enable: true, order: 0 },
            ClientAssignment { client_id: 1, user_id: U, enable: true, order: 1 },
        ];

        apply_committed(&mut clients, &committed);

        assert_eq!(ids(&project_for_user(&clients, U)), vec![2, 1]);
        assert_eq!(clients[0].assignment_for(OTHER).map(|a| a.order), Some(4));
        assert_eq!(clients[1].assignment_for(OTHER).map(|a| a.order), Some(2));
    }
}
