pub mod attribute_service;
pub mod entity_service;
pub mod export_service;
pub mod member_service;
pub mod model_service;
pub mod project_service;
pub mod referential_service;

pub use attribute_service::AttributeService;
pub use entity_service::EntityService;
pub use export_service::{ExportFormat, ExportService, ModelExport};
pub use member_service::MemberService;
pub use model_service::ModelService;
pub use project_service::ProjectService;
pub use referential_service::ReferentialService;
