//! Randomized values for entity fields.
//!
//! Usernames, emails and passwords combine a millisecond timestamp with a
//! v4 UUID, so values generated in the same millisecond still differ.

use chrono::Local;
use rand::seq::IndexedRandom;
use rand::Rng;
use uuid::Uuid;

const PET_NAMES: &[&str] = &[
    "Bella", "Max", "Charlie", "Luna", "Rocky", "Daisy", "Buddy", "Lucy",
];

pub const PET_STATUSES: &[&str] = &["available", "pending", "sold"];

fn unique_suffix() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{millis}_{}", Uuid::new_v4().simple())
}

/// In `1..=1_000_000`.
pub fn pet_id() -> i64 {
    rand::rng().random_range(1..=1_000_000)
}

/// In `1..=1_000_000`.
pub fn order_id() -> i64 {
    rand::rng().random_range(1..=1_000_000)
}

pub fn pet_name() -> String {
    PET_NAMES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("Bella")
        .to_string()
}

pub fn username() -> String {
    format!("user_{}", unique_suffix())
}

pub fn email() -> String {
    format!("test_{}@petstore.com", unique_suffix())
}

pub fn password() -> String {
    format!("Pass@{}", unique_suffix())
}

/// In `1..=100`.
pub fn quantity() -> i32 {
    rand::rng().random_range(1..=100)
}

/// Local time as `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
