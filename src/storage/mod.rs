pub mod events;
pub mod kv;
pub mod record_store;

pub use events::{StoreEvent, SubscriptionId};
pub use kv::{FileKeyValueStore, KeyValueStore, KeyValueStoreExt, MemoryKeyValueStore, namespaced_key};
pub use record_store::{InsertPosition, RecordStore, StoreSnapshot};
