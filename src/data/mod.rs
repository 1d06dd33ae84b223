pub mod catalog;
pub mod entity;

pub use catalog::Catalog;
pub use entity::{
    search_points_from_json, BuildingSpecs, CatalogEntity, Category, EntityDetails, MapEntity,
    RawEntity, SearchPoint,
};
