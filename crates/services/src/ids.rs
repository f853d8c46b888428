//! Collision-free id generation: `<prefix>-<unix millis>-<random>`.

use chrono::{DateTime, Utc};
use domains::EntityKind;
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 8;

pub fn generate_id(kind: EntityKind, now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        kind.id_prefix(),
        now.timestamp_millis(),
        &random[..RANDOM_SUFFIX_LEN]
    )
}
