// Styling core: silhouette classification, rule tables and recommendation assembly.
// Everything except `handlers` is pure and synchronous.

pub mod body_shape;
pub mod handlers;
pub mod recommend;
pub mod rules;
