//! Dropbins Core
//!
//! Layered architecture:
//! - domain: containers, items and the board that owns them
//! - hasher / side_table: transport-safe identity correlation
//! - transport: the drag data channel abstraction
//! - host: the tutoring engine surface (actions, grading, components)
//! - protocol: the drag transfer state machine

mod config;
mod domain;
mod error;
mod hasher;
mod host;
mod ids;
mod protocol;
mod side_table;
mod transport;


pub use config::{parse_limit, BoardConfig, ContainerDecl, ItemDecl, LimitAttr, DEFAULT_GROUP};
pub use domain::{
    Board, BoardSnapshot, Container, ContainerId, ContainerSnapshot, Entity, GradeMark, Item,
    ItemId, ItemIdentity, ItemNode, ItemSnapshot, Origin, Purpose, TEXT_TAG,
};
pub use error::{RejectReason, TransferError, TransferResult};
pub use hasher::{hash, IdentityHasher, PolynomialHasher};
pub use host::{ActionRecord, HostBridge, RecordedCall, RecordingHost, Verdict, ACTION_ADD, ACTION_SET_CHILDREN};
pub use ids::{IdGenerator, SequentialIds};
pub use protocol::{
    CommitOutcome, DragSession, Evaluation, FeedbackOutcome, Phase, StartOutcome, TransferProtocol,
};
pub use side_table::{DragSideTable, SideEntry};
pub use transport::{
    parse_tag_key, tag_key, DragTransport, MemoryTransport, FORMAT_GROUP, FORMAT_ORIGINAL, FORMAT_ORIGIN_CONTAINER,
    FORMAT_PRIMARY, TAG_PREFIX,
};
