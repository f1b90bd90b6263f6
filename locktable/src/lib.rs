pub mod base;
pub mod column;
pub mod dom;
pub mod error;
pub mod event;
pub mod fixed;
pub mod geometry;
pub mod lock;
pub mod props;
pub mod registry;
pub mod schedule;
pub mod table;
pub mod types;

pub use base::{HeadlessInstance, HeadlessTable};
pub use column::{ColumnDef, ColumnNode, ColumnPartition, Lock};
pub use dom::{Dom, MemoryDom, NodeId, NodeMetrics, StyleProp};
pub use error::LookupError;
pub use event::{ScrollSource, TableEvent};
pub use fixed::FixedTable;
pub use geometry::{ScrollbarSize, StyleWrite};
pub use lock::{LockDecision, LockMode, LockTable};
pub use props::{BodyHeight, Components, TableProps};
pub use registry::{TableContext, TableInstance};
pub use table::{BaseTable, DecoratedTable, Decorator, Outcome};
pub use types::*;
