//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, parsing, conversion, and display
//! formatting for every record type.

use core_kernel::{
    EntryId, CommentId, PartnerId, SavedSearchId,
    CheckoffId, EvidenceId, AnnotationId, UserId,
};
use std::collections::HashSet;
use uuid::Uuid;

mod record_ids {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let ids: HashSet<EntryId> = (0..100).map(|_| EntryId::new()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(EntryId::prefix(), "ENT");
        assert_eq!(CommentId::prefix(), "CMT");
        assert_eq!(PartnerId::prefix(), "PTR");
        assert_eq!(SavedSearchId::prefix(), "SRCH");
        assert_eq!(CheckoffId::prefix(), "CHK");
        assert_eq!(EvidenceId::prefix(), "EVD");
        assert_eq!(AnnotationId::prefix(), "ANN");
    }

    #[test]
    fn test_uuid_round_trip() {
        let uuid = Uuid::now_v7();
        let id = AnnotationId::from_uuid(uuid);
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("ENT-not-a-uuid".parse::<EntryId>().is_err());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = PartnerId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

mod user_ids {
    use super::*;

    #[test]
    fn test_user_id_display_is_subject() {
        let id = UserId::new("us-east-1:abc").unwrap();
        assert_eq!(id.to_string(), "us-east-1:abc");
    }

    #[test]
    fn test_user_id_ordering_is_lexicographic() {
        let a = UserId::new("a").unwrap();
        let b = UserId::new("b").unwrap();
        assert!(a < b);
    }
}
