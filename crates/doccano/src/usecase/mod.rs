//! Higher-level operations composed from one or more repositories.
//!
//! Use-cases resolve human-friendly references (usernames, role names,
//! label-type names) into ids before any mutating call, and turn partial
//! updates into full records by fetching the current state first.

pub mod comment;
pub mod data_download;
pub mod data_upload;
pub mod example;
pub mod label;
pub mod label_type;
pub mod member;
pub mod project;
pub mod user_details;

pub use comment::CommentUseCase;
pub use data_download::DataDownloadUseCase;
pub use data_upload::DataUploadUseCase;
pub use example::{ExamplePatch, ExampleUseCase};
pub use label::{
    BoundingBoxPatch, CategoryPatch, LabelOptions, LabelUseCase, RelationPatch, SegmentPatch,
    SpanPatch, TextPatch,
};
pub use label_type::{LabelTypePatch, LabelTypeUseCase, NewLabelType};
pub use member::MemberUseCase;
pub use project::{ProjectPatch, ProjectUseCase};
pub use user_details::{UserDetailsPatch, UserDetailsUseCase};

/// A label type given by id or by its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelTypeRef {
    Id(i64),
    Name(String),
}

impl From<i64> for LabelTypeRef {
    fn from(id: i64) -> Self {
        LabelTypeRef::Id(id)
    }
}

impl From<&str> for LabelTypeRef {
    fn from(name: &str) -> Self {
        LabelTypeRef::Name(name.to_string())
    }
}

impl From<String> for LabelTypeRef {
    fn from(name: String) -> Self {
        LabelTypeRef::Name(name)
    }
}
