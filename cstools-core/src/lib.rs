pub mod api;
pub mod config;
pub mod error;
pub mod middlewares;
pub mod models;
pub mod thoughtspot;
pub mod ux;

pub use api::{MetadataListParams, RestApiV1, ThoughtSpotApi};
pub use config::{
    get_config_dir, CsToolsConfig, DisplayConfig, FetchConfig, LoggingConfig, ThoughtSpotConfig,
};
pub use error::{CliErrorDisplay, CsToolsError, CsToolsResult};
pub use middlewares::{
    DataSourceSelector, MetadataMiddleware, MetadataQuery, SearchMiddleware, UserMiddleware,
};
pub use models::{
    GuidTracker, ListPage, MetadataCategory, MetadataSubtype, MetadataType, ObjectKind,
    PermissionType, Record, SharingAccess,
};
pub use thoughtspot::ThoughtSpot;
pub use ux::{TaskBoard, TaskGuard, TaskStatus, WorkTask};
