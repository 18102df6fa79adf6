//! Header resolution: decide which columns hold cast, crew and the movie id.

use crate::models::{ColumnRef, ColumnSelection};

const CAST_HEADER: &str = "cast";
const CREW_HEADER: &str = "crew";

/// Id header names, most preferred first.
pub const ID_HEADERS: [&str; 3] = ["id", "movie_id", "tmdb_id"];

/// Resolve cast, crew and id columns from the header row.
///
/// Names match case-insensitively and exactly. When cast or crew stays
/// unresolved and there are at least two columns, the first column fills the
/// cast slot and the second the crew slot; a slot already resolved by name is
/// never overwritten. The id column has no positional fallback.
pub fn resolve_columns(headers: &[String]) -> ColumnSelection {
    let find = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.to_lowercase() == wanted)
            .map(|i| ColumnRef::new(i, headers[i].clone()))
    };

    let mut cast = find(CAST_HEADER);
    let mut crew = find(CREW_HEADER);
    let id = ID_HEADERS.iter().find_map(|&name| find(name));

    if (cast.is_none() || crew.is_none()) && headers.len() >= 2 {
        cast = cast.or_else(|| Some(ColumnRef::new(0, headers[0].clone())));
        crew = crew.or_else(|| Some(ColumnRef::new(1, headers[1].clone())));
    }

    ColumnSelection { cast, crew, id }
}
