//! One repository per server resource.
//!
//! Repositories map typed records to and from JSON and know each resource's
//! URL shape. They do no name resolution; that lives in [`crate::usecase`].

use serde::Serialize;

use crate::error::{DoccanoError, Result};
use crate::models::{
    BoundingBox, Category, Comment, Example, LabelType, Member, Project, Relation, Segment, Span,
    Text,
};

pub mod comment;
pub mod data_download;
pub mod data_upload;
pub mod example;
pub mod label;
pub mod label_type;
pub mod member;
pub mod metrics;
pub mod project;
pub mod role;
pub mod task_status;
pub mod user;
pub mod user_details;

pub use comment::CommentRepository;
pub use data_download::DataDownloadRepository;
pub use data_upload::DataUploadRepository;
pub use example::ExampleRepository;
pub use label::LabelRepository;
pub use label_type::LabelTypeRepository;
pub use member::MemberRepository;
pub use metrics::MetricsRepository;
pub use project::ProjectRepository;
pub use role::RoleRepository;
pub use task_status::TaskStatusRepository;
pub use user::UserRepository;
pub use user_details::UserDetailsRepository;

/// Anything that identifies a stored record: a raw id or the record itself.
pub trait IntoId {
    fn into_id(self) -> Result<i64>;
}

impl IntoId for i64 {
    fn into_id(self) -> Result<i64> {
        Ok(self)
    }
}

impl IntoId for &i64 {
    fn into_id(self) -> Result<i64> {
        Ok(*self)
    }
}

macro_rules! into_id {
    ($name:literal, $($ty:ty => |$v:ident| $id:expr),* $(,)?) => {
        $(
            impl IntoId for &$ty {
                fn into_id(self) -> Result<i64> {
                    let $v = self;
                    $id.ok_or_else(|| DoccanoError::validation(concat!($name, " id is required")))
                }
            }
        )*
    };
}

into_id!(
    "record",
    Project => |p| p.id,
    Example => |e| e.id,
    Comment => |c| c.id,
    Member => |m| m.id,
    LabelType => |l| l.id,
    Category => |l| l.meta.id,
    Span => |l| l.meta.id,
    Relation => |l| l.meta.id,
    Text => |l| l.meta.id,
    Segment => |l| l.meta.id,
    BoundingBox => |l| l.meta.id,
);

/// Body of every bulk-delete call.
#[derive(Debug, Serialize)]
pub(crate) struct Ids {
    pub ids: Vec<i64>,
}

impl Ids {
    pub(crate) fn collect<I, T>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: IntoId,
    {
        let ids = items
            .into_iter()
            .map(IntoId::into_id)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ids })
    }
}

/// Require an id on a record about to be updated.
pub(crate) fn require_id(id: Option<i64>, what: &str) -> Result<i64> {
    id.ok_or_else(|| DoccanoError::validation(format!("{what} id is required")))
}
