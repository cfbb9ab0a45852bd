//! Typed records for every resource the server exposes.

pub mod comment;
pub mod data_export;
pub mod data_import;
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

pub use comment::Comment;
pub use data_export::ExportOption;
pub use data_import::{ColumnMapping, ImportOption, Task};
pub use example::Example;
pub use label::{
    BoundingBox, Category, Label, LabelKind, LabelMeta, LabelVariant, Relation, Segment, Span,
    Text,
};
pub use label_type::{LabelType, LabelTypeKind, PrefixKey, SuffixKey};
pub use member::Member;
pub use metrics::{LabelCount, LabelDistribution, MemberProgress, Progress};
pub use project::{Project, ProjectType};
pub use role::Role;
pub use task_status::TaskStatus;
pub use user::User;
pub use user_details::{PasswordChange, PasswordUpdated, UserDetails};
