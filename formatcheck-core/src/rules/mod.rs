// Main rules module - one checker per file, coordinated by the engine:
// - engine.rs: RuleEngine, CheckRule trait and the shared CheckContext
// - page_geometry.rs: margins and page size
// - font.rs / spacing.rs: per-paragraph font and line spacing
// - headings.rs: heading capitalization and weight against the TOC topics
// - lists.rs: list block indents and manual marker spacing
// - tables.rs / table_span.rs: table labels, continuation labels, cell fonts, page span
// - captions.rs: image and caption conventions
// - centered_indents.rs: zero indents on centered paragraphs
// - project_stages.rs: indent consistency of the project stages section

pub mod captions;
pub mod centered_indents;
pub mod engine;
pub mod font;
pub mod headings;
pub mod lists;
pub mod page_geometry;
pub mod project_stages;
pub mod spacing;
pub mod table_span;
pub mod tables;

pub use engine::*;

/// Rule names as they appear in profile pipelines
pub mod names {
    pub const PAGE_GEOMETRY: &str = "PageGeometry";
    pub const FONT: &str = "Font";
    pub const SPACING: &str = "Spacing";
    pub const HEADINGS: &str = "Headings";
    pub const LISTS: &str = "Lists";
    pub const TABLES: &str = "Tables";
    pub const TABLE_SPAN: &str = "TableSpan";
    pub const CAPTIONS: &str = "Captions";
    pub const CENTERED_INDENTS: &str = "CenteredIndents";
    pub const PROJECT_STAGES: &str = "ProjectStages";

    pub const ALL: [&str; 10] = [
        PAGE_GEOMETRY,
        FONT,
        SPACING,
        HEADINGS,
        LISTS,
        TABLES,
        TABLE_SPAN,
        CAPTIONS,
        CENTERED_INDENTS,
        PROJECT_STAGES,
    ];
}
