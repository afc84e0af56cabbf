// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup wiring
// - infrastructure: filesystem storage and image header adapters
// - presentation: HTTP handlers, routing and static serving
// - application: ports and use cases of the ingestion pipeline
// - domain: extension policy, stored names, metadata

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
