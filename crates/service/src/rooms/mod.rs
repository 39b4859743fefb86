//! Room status board: listing, statistics and status updates.

pub mod repository;
pub mod service;

pub use repository::{RoomFilter, RoomRepository, RoomStatusPatch, SeaOrmRoomRepository};
pub use service::{RoomService, RoomStatistics};

pub const STATUS_AVAILABLE: &str = "available";
pub const STATUS_OCCUPIED: &str = "occupied";
pub const STATUS_CLEANING: &str = "cleaning";
pub const STATUS_MAINTENANCE: &str = "maintenance";
