mod memory;
mod models;
mod postgres;
mod querier;
mod store;

pub use self::{
    memory::MemoryDb,
    postgres::{DBPool, SCHEMA, connect, init_db_from_env, migrate},
    querier::Querier,
    store::{Change, Changeset, Store},
};

/// 完整的存储能力：查询 + 写入
///
/// 由 [`AppState`](crate::state::AppState) 以 `Arc<dyn Database>` 持有。
pub trait Database: Querier + Store {}

impl<T: Querier + Store> Database for T {}
