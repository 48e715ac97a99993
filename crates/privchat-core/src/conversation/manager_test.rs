#[cfg(test)]
mod tests {
    use crate::conversation::manager::ConversationManager;
    use crate::conversation::message::Role;
    use crate::conversation::model::DEFAULT_TITLE;
    use crate::error::ChatError;

    fn contents(messages: &[crate::conversation::Message]) -> Vec<String> {
        messages.iter().map(|m| m.content().to_string()).collect()
    }

    #[test]
    fn test_new_manager_has_one_active_conversation() {
        let manager = ConversationManager::new(true);
        assert_eq!(manager.len(), 1);
        assert!(manager.active().messages.is_empty());
        assert_eq!(manager.active().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_append_rejects_system_role() {
        let mut manager = ConversationManager::new(false);
        let err = manager.append_message(Role::System, "be nice").unwrap_err();
        assert_eq!(err, ChatError::InvalidRole(Role::System));
        assert!(manager.active().messages.is_empty());
    }

    #[test]
    fn test_history_returns_last_messages_in_order() {
        let mut manager = ConversationManager::new(false);
        for i in 0..15 {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            manager.append_message(role, format!("m{i}")).unwrap();
        }

        let window = manager.history(10);
        let expected: Vec<String> = (5..15).map(|i| format!("m{i}")).collect();
        assert_eq!(contents(&window), expected);
    }

    #[test]
    fn test_history_bound_for_every_length() {
        for total in 0usize..8 {
            for limit in 0..10 {
                let mut manager = ConversationManager::new(false);
                for i in 0..total {
                    manager.append_message(Role::User, format!("m{i}")).unwrap();
                }
                let window = manager.history(limit);
                let expected: Vec<String> = (total.saturating_sub(limit)..total)
                    .map(|i| format!("m{i}"))
                    .collect();
                assert_eq!(window.len(), limit.min(total));
                assert_eq!(contents(&window), expected);
            }
        }
    }

    #[test]
    fn test_first_user_message_sets_title() {
        let mut manager = ConversationManager::new(false);
        manager
            .append_message(Role::User, "How do lifetimes interact with async fns?")
            .unwrap();
        assert_eq!(manager.active().title, "How do lifetimes interact with...");

        manager.append_message(Role::User, "another").unwrap();
        assert_eq!(manager.active().title, "How do lifetimes interact with...");
    }

    #[test]
    fn test_custom_title_survives_later_messages() {
        let mut manager = ConversationManager::new(true);
        let id = manager.active_id().to_string();
        manager.set_title(&id, "Rust questions").unwrap();
        manager.append_message(Role::User, "What is a trait?").unwrap();
        assert_eq!(manager.active().title, "Rust questions");
    }

    #[test]
    fn test_rename_to_placeholder_text_is_not_overwritten() {
        let mut manager = ConversationManager::new(true);
        let id = manager.active_id().to_string();
        manager.set_title(&id, DEFAULT_TITLE).unwrap();
        manager.append_message(Role::User, "What is a trait?").unwrap();
        assert_eq!(manager.active().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_clear_active_allows_title_to_be_derived_again() {
        let mut manager = ConversationManager::new(true);
        let id = manager.active_id().to_string();
        manager.set_title(&id, "Pinned").unwrap();
        manager.clear_active();
        manager.append_message(Role::User, "fresh start").unwrap();
        assert_eq!(manager.active().title, "fresh start");
    }

    #[test]
    fn test_switch_to_unknown_id_leaves_state_unchanged() {
        let mut manager = ConversationManager::new(true);
        manager.append_message(Role::User, "hello").unwrap();
        let before_id = manager.active_id().to_string();
        let before = manager.active().clone();

        let err = manager.switch_active("does-not-exist").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(manager.active_id(), before_id);
        assert_eq!(manager.active(), &before);
    }

    #[test]
    fn test_switch_does_not_mutate_other_conversations() {
        let mut manager = ConversationManager::new(true);
        let first = manager.active_id().to_string();
        manager.append_message(Role::User, "first chat").unwrap();
        let first_snapshot = manager.get(&first).unwrap().clone();

        let second = manager.create_conversation();
        manager.append_message(Role::User, "second chat").unwrap();

        manager.switch_active(&first).unwrap();
        assert_eq!(manager.active_id(), first);
        assert_eq!(manager.get(&first).unwrap(), &first_snapshot);
        assert_eq!(contents(&manager.get(&second).unwrap().messages), vec!["second chat"]);
    }

    #[test]
    fn test_single_conversation_mode_replaces_previous() {
        let mut manager = ConversationManager::new(false);
        let old = manager.active_id().to_string();
        manager.append_message(Role::User, "hi").unwrap();

        let new = manager.create_conversation();

        assert_eq!(manager.len(), 1);
        assert_ne!(old, new);
        assert!(manager.get(&old).is_err());
    }

    #[test]
    fn test_append_to_targets_specific_conversation() {
        let mut manager = ConversationManager::new(true);
        let first = manager.active_id().to_string();
        manager.create_conversation();

        manager.append_to(&first, Role::Assistant, "late reply").unwrap();

        assert_eq!(contents(&manager.get(&first).unwrap().messages), vec!["late reply"]);
        assert!(manager.active().messages.is_empty());
    }

    #[test]
    fn test_delete_active_activates_newest_remaining() {
        let mut manager = ConversationManager::new(true);
        let first = manager.active_id().to_string();
        let second = manager.create_conversation();
        let third = manager.create_conversation();

        manager.delete_conversation(&third).unwrap();
        assert_eq!(manager.len(), 2);
        assert_ne!(manager.active_id(), third);
        assert!(manager.active_id() == second || manager.active_id() == first);
    }

    #[test]
    fn test_delete_last_conversation_creates_fresh_one() {
        let mut manager = ConversationManager::new(true);
        let only = manager.active_id().to_string();
        manager.delete_conversation(&only).unwrap();
        assert_eq!(manager.len(), 1);
        assert_ne!(manager.active_id(), only);
    }

    #[test]
    fn test_clear_active_resets_messages_and_title() {
        let mut manager = ConversationManager::new(false);
        manager.append_message(Role::User, "something private").unwrap();
        manager.clear_active();
        assert!(manager.active().messages.is_empty());
        assert_eq!(manager.active().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_resolve_prefix() {
        let mut manager = ConversationManager::new(true);
        let id = manager.active_id().to_string();
        manager.create_conversation();

        assert_eq!(manager.resolve_prefix(&id).unwrap(), id);
        assert!(manager.resolve_prefix("zzzz-not-a-uuid").unwrap_err().is_not_found());
        assert!(manager.resolve_prefix("").is_err());
    }

    #[test]
    fn test_list_marks_active_and_orders_newest_first() {
        let mut manager = ConversationManager::new(true);
        manager.create_conversation();
        let newest = manager.create_conversation();

        let list = manager.list();
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().filter(|s| s.active).count(), 1);
        assert!(list.iter().any(|s| s.id == newest && s.active));
        assert!(list.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}
