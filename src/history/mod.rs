mod persistence;
mod store;

pub use store::ChatHistoryStore;
