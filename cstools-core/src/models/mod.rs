mod metadata;
mod page;
mod security;

pub use metadata::{MetadataCategory, MetadataSubtype, MetadataType, ObjectKind};
pub use page::{str_field, GuidTracker, ListPage, Record};
pub use security::{PermissionEntry, PermissionType, SharingAccess};
