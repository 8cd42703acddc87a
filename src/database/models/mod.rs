pub mod attribute;
pub mod data_model;
pub mod entity;
pub mod member;
pub mod project;
pub mod referential;

pub use attribute::{Attribute, AttributePatch, NewAttribute};
pub use data_model::{DataModel, DataModelPatch, NewDataModel};
pub use entity::{Entity, EntityPatch, NewEntity};
pub use member::{AddMember, ChangeAccess, ProjectMember};
pub use project::{NewProject, Project, ProjectPatch};
pub use referential::{NewReferential, Referential, ReferentialPatch, CARDINALITIES, ON_DELETE_ACTIONS};
