#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::server::auth::CredentialStore;
    use crate::server::coordinator::directory::LobbyDirectory;
    use crate::server::coordinator::messages::{ClientEvent, LobbyList, ServerEvent};
    use crate::server::coordinator::payload::StatePayload;
    use crate::server::coordinator::registry::ConnectionRegistry;
    use crate::server::coordinator::types::ChatRecord;

    fn full_state() -> Value {
        json!({
            "player_id": "p1",
            "position": {"x": 1.0, "y": 2.0, "z": 3.0},
            "rotation": {"x": 0.0, "y": 90.0, "z": 0.0},
            "velocity": {"x": 0.0, "y": 0.0, "z": 0.0},
            "animation": "run",
            "sound": "footstep",
            "objects": [{"id": "obj1", "state": {"active": true}}]
        })
    }

    #[test]
    fn test_start_match_then_join_preserves_member_order() {
        let mut dir = LobbyDirectory::new();
        dir.start_match("arena", Some("p1".to_string()));
        let history = dir.join("arena", Some("p2".to_string()));
        // The second member gets the (empty) history back for replay.
        assert_eq!(history, Some(vec![]));
        assert_eq!(
            dir.members("arena"),
            Some(&[Some("p1".to_string()), Some("p2".to_string())][..])
        );
    }

    #[test]
    fn test_join_unknown_lobby_is_noop() {
        let mut dir = LobbyDirectory::new();
        assert_eq!(dir.join("none", Some("p1".to_string())), None);
        assert!(dir.names().is_empty());
    }

    #[test]
    fn test_duplicate_members_are_kept() {
        let mut dir = LobbyDirectory::new();
        dir.start_match("arena", Some("p1".to_string()));
        dir.join("arena", Some("p1".to_string()));
        assert_eq!(dir.members("arena").map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_leave_all_removes_empty_lobby_and_history() {
        let mut dir = LobbyDirectory::new();
        dir.start_match("arena", Some("p1".to_string()));
        dir.post_chat("arena", Some("p1".to_string()), "hi");
        dir.leave_all("p1");
        assert!(dir.names().is_empty());
        // The lobby is gone, so a later join cannot revive its history.
        assert_eq!(dir.join("arena", Some("p3".to_string())), None);
    }

    #[test]
    fn test_leave_all_keeps_lobbies_with_other_members() {
        let mut dir = LobbyDirectory::new();
        dir.start_match("arena", Some("p1".to_string()));
        dir.join("arena", Some("p2".to_string()));
        dir.start_match("pit", Some("p1".to_string()));
        dir.leave_all("p1");
        assert_eq!(dir.names(), vec!["arena".to_string()]);
        assert_eq!(dir.members("arena"), Some(&[Some("p2".to_string())][..]));
    }

    #[test]
    fn test_post_chat_appends_one_timestamped_record() {
        let mut dir = LobbyDirectory::new();
        dir.start_match("arena", Some("p1".to_string()));
        let record = dir
            .post_chat("arena", Some("p1".to_string()), "hi")
            .expect("chat in a live lobby is accepted");
        assert_eq!(record.player_id.as_deref(), Some("p1"));
        assert_eq!(record.message, "hi");
        assert!(DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
        assert_eq!(dir.history("arena").map(|h| h.len()), Some(1));
    }

    #[test]
    fn test_post_chat_rejects_missing_lobby_and_empty_text() {
        let mut dir = LobbyDirectory::new();
        assert!(dir.post_chat("arena", Some("p1".to_string()), "hi").is_none());
        dir.start_match("arena", Some("p1".to_string()));
        assert!(dir.post_chat("arena", Some("p1".to_string()), "").is_none());
        assert_eq!(dir.history("arena").map(|h| h.len()), Some(0));
    }

    #[test]
    fn test_join_replays_history_in_order() {
        let mut dir = LobbyDirectory::new();
        dir.start_match("arena", Some("p1".to_string()));
        dir.post_chat("arena", Some("p1".to_string()), "first");
        dir.post_chat("arena", None, "second");
        let history = dir.join("arena", Some("p2".to_string())).expect("lobby exists");
        let texts: Vec<&str> = history.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        // Messages from a connection without a bound identity carry no sender.
        assert_eq!(history[1].player_id, None);
    }

    #[test]
    fn test_anonymous_member_keeps_lobby_alive() {
        let mut dir = LobbyDirectory::new();
        dir.start_match("arena", None);
        dir.join("arena", Some("p1".to_string()));
        dir.leave_all("p1");
        assert_eq!(dir.names(), vec!["arena".to_string()]);
    }

    #[test]
    fn test_registry_bind_and_deregister() {
        let mut reg = ConnectionRegistry::new();
        let conn = Uuid::new_v4();
        reg.register(conn);
        assert_eq!(reg.player_of(conn), None);
        assert_eq!(reg.bind(conn, "p1".to_string()), None);
        assert_eq!(reg.player_of(conn).map(String::as_str), Some("p1"));
        assert_eq!(reg.deregister(conn), Some("p1".to_string()));
        assert_eq!(reg.player_of(conn), None);
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn test_registry_second_bind_displaces_first_connection() {
        let mut reg = ConnectionRegistry::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        reg.register(a);
        reg.register(b);
        reg.bind(a, "p1".to_string());
        assert_eq!(reg.bind(b, "p1".to_string()), Some(a));
        // The identity moved: the displaced connection is unbound, not removed.
        assert_eq!(reg.player_of(a), None);
        assert_eq!(reg.player_of(b).map(String::as_str), Some("p1"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_registry_rebind_same_connection_overwrites() {
        let mut reg = ConnectionRegistry::new();
        let conn = Uuid::new_v4();
        reg.register(conn);
        reg.bind(conn, "p1".to_string());
        assert_eq!(reg.bind(conn, "p2".to_string()), None);
        assert_eq!(reg.player_of(conn).map(String::as_str), Some("p2"));
    }

    #[test]
    fn test_registry_unbind_keeps_connection() {
        let mut reg = ConnectionRegistry::new();
        let conn = Uuid::new_v4();
        reg.register(conn);
        reg.bind(conn, "p1".to_string());
        assert_eq!(reg.unbind(conn), Some("p1".to_string()));
        assert_eq!(reg.player_of(conn), None);
        assert_eq!(reg.len(), 1);
        // The physical close later finds no binding left.
        assert_eq!(reg.deregister(conn), None);
    }

    #[test]
    fn test_registry_deregister_unknown_connection_is_safe() {
        let mut reg = ConnectionRegistry::new();
        assert_eq!(reg.deregister(Uuid::new_v4()), None);
    }

    #[test]
    fn test_state_payload_accepts_full_shape() {
        let state = full_state();
        let parsed = StatePayload::parse(Some(&state)).expect("payload should validate");
        assert_eq!(parsed.player_id, "p1");
        assert_eq!(parsed.position.z, 3.0);
        assert_eq!(parsed.objects.len(), 1);
        assert_eq!(parsed.objects[0].id, "obj1");
    }

    #[test]
    fn test_state_payload_rejects_missing_axis() {
        let mut state = full_state();
        state["position"].as_object_mut().unwrap().remove("z");
        let err = StatePayload::parse(Some(&state)).expect_err("missing z must fail");
        assert!(err.contains("z"));
    }

    #[test]
    fn test_state_payload_ignores_unknown_fields() {
        let mut state = full_state();
        state.as_object_mut().unwrap().insert("extra".to_string(), json!(42));
        assert!(StatePayload::parse(Some(&state)).is_ok());
    }

    #[test]
    fn test_state_payload_requires_state_field() {
        assert!(StatePayload::parse(None).is_err());
    }

    #[test]
    fn test_state_payload_rejects_wrong_type() {
        let mut state = full_state();
        state["animation"] = json!(7);
        assert!(StatePayload::parse(Some(&state)).is_err());
    }

    #[test]
    fn test_client_event_parses_tagged_frames() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"player_connected","player_id":"p1"}"#).unwrap();
        match event {
            ClientEvent::PlayerConnected { player_id } => {
                assert_eq!(player_id.as_deref(), Some("p1"))
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_client_event_tolerates_missing_fields() {
        let event: ClientEvent = serde_json::from_str(r#"{"event":"match_start"}"#).unwrap();
        match event {
            ClientEvent::MatchStart { lobby } => assert_eq!(lobby, None),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_client_event_unknown_kind_fails_to_parse() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"warp_drive"}"#).is_err());
    }

    #[test]
    fn test_server_error_event_wire_shape() {
        let value = serde_json::to_value(&ServerEvent::Error {
            detail: "bad payload".to_string(),
        })
        .unwrap();
        assert_eq!(value["event"], "error");
        assert_eq!(value["detail"], "bad payload");
    }

    #[test]
    fn test_server_match_end_wire_shape() {
        let value = serde_json::to_value(&ServerEvent::MatchEnd).unwrap();
        assert_eq!(value, json!({"event": "match_end"}));
    }

    #[test]
    fn test_lobby_list_uses_event_name_tag() {
        let value = serde_json::to_value(&LobbyList::new(vec!["arena".to_string()])).unwrap();
        assert_eq!(value["eventName"], "lobby_list");
        assert_eq!(value["lobbies"], json!(["arena"]));
    }

    #[test]
    fn test_chat_message_event_wire_shape() {
        let record = ChatRecord {
            player_id: Some("p1".to_string()),
            message: "hi".to_string(),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        };
        let value = serde_json::to_value(&ServerEvent::ChatMessage {
            lobby: "arena".to_string(),
            message: record,
        })
        .unwrap();
        assert_eq!(value["event"], "chat_message");
        assert_eq!(value["lobby"], "arena");
        assert_eq!(value["message"]["player_id"], "p1");
        assert_eq!(value["message"]["message"], "hi");
    }

    #[test]
    fn test_credentials_register_then_verify() {
        let store = CredentialStore::default();
        assert!(store.register("alice", "secret"));
        assert!(!store.register("alice", "other"));
        assert!(store.verify("alice", "secret"));
        assert!(!store.verify("alice", "wrong"));
        assert!(!store.verify("bob", "secret"));
    }
}
