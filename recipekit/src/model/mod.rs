pub(crate) use recipe::recipe_key;
pub use recipe::{AuthApply, ProjectConfig, RecipeDescriptor, RequestBody};
pub use request::{
    AuthConfig, AuthPayload, Method, ParsedRequest, UnknownMethod, AUTHORIZATION_HEADER,
};
pub use schema::{Property, SchemaKind, SchemaMeta, SchemaNode, SchemaRef};

mod recipe;
mod request;
mod schema;
