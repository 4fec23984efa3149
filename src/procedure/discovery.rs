use rhai::AST;

/// A script function selected for invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Callable {
    /// Function name as declared
    pub name: String,
    /// Number of declared parameters
    pub arity: usize,
}

/// Pick the function a procedure text should be invoked through
///
/// A function with the canonical name is preferred (the widest overload if
/// several exist). Otherwise the function whose `fn` declaration appears last
/// in the source wins. Returns `None` when the text declares no function.
pub fn resolve_callable(ast: &AST, source: &str, canonical: &str) -> Option<Callable> {
    let declared: Vec<Callable> = ast
        .iter_functions()
        .map(|f| Callable {
            name: f.name.to_string(),
            arity: f.params.len(),
        })
        .collect();

    let canonical_match = declared
        .iter()
        .filter(|c| c.name == canonical)
        .max_by_key(|c| c.arity)
        .cloned();

    canonical_match.or_else(|| {
        declared
            .into_iter()
            .max_by_key(|c| (declaration_offset(source, &c.name), c.arity))
    })
}

/// Byte offset of the last `fn <name>(` declaration in the source
///
/// A lexical scan; a declaration inside a comment or string literal would
/// also count.
pub fn declaration_offset(source: &str, name: &str) -> Option<usize> {
    source
        .match_indices(name)
        .filter(|&(offset, _)| {
            let before = source.get(..offset).unwrap_or_default();
            let after = source.get(offset + name.len()..).unwrap_or_default();
            declares_function(before) && after.trim_start().starts_with('(')
        })
        .map(|(offset, _)| offset)
        .last()
}

fn declares_function(before: &str) -> bool {
    let trimmed = before.trim_end();
    // Whitespace must separate `fn` from the name
    if trimmed.len() == before.len() {
        return false;
    }
    trimmed.strip_suffix("fn").is_some_and(|head| {
        head.chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    })
}
