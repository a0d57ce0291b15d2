/// Named style slots. Model types only ever refer to categories; the printer's
/// theme resolves them to concrete terminal styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    Text,
    Key,
    String,
    Number,
    Bool,
    Null,
    BlockScalar,
    Tag,
    Anchor,
    Alias,
    Indicator,
    Comment,
    Directive,
    Document,
    Deleted,
    Inserted,
    Search,
    SearchSelected,
    Annotation,
    Gutter,
    Separator,
    Border,
    Status,
}
