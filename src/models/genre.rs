// Жанры TMDB: id -> название и ярлыки из раздела "жанры" -> id.

const GENRE_NAMES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Sci-Fi"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

const GENRE_LABELS: &[(&str, u32)] = &[
    ("Comedy", 35),
    ("Comedies", 35),
    ("Crime", 80),
    ("Family", 10751),
    ("Documentaries", 99),
    ("Documentary", 99),
    ("Dramas", 18),
    ("Drama", 18),
    ("Fantasy", 14),
    ("Holidays", 10749),
    ("Holiday", 10749),
    ("Horror", 27),
    ("Sci-Fi", 878),
    ("SciFi", 878),
    ("Thriller", 53),
];

/// Жанр, который показываем для неизвестного ярлыка.
pub const DEFAULT_GENRE_ID: u32 = 35;

/// Сколько фильмов отдаём при просмотре жанра.
pub const GENRE_RESULTS_LIMIT: usize = 10;

pub fn genre_name(id: u32) -> &'static str {
    GENRE_NAMES
        .iter()
        .find(|(gid, _)| *gid == id)
        .map(|(_, name)| *name)
        .unwrap_or("Movie")
}

pub fn genre_id_for_label(label: &str) -> u32 {
    GENRE_LABELS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, id)| *id)
        .unwrap_or(DEFAULT_GENRE_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_ids() {
        assert_eq!(genre_name(878), "Sci-Fi");
        assert_eq!(genre_name(10770), "TV Movie");
        assert_eq!(genre_name(1), "Movie");
    }

    #[test]
    fn labels_resolve_plural_aliases() {
        assert_eq!(genre_id_for_label("Dramas"), 18);
        assert_eq!(genre_id_for_label("Holiday"), 10749);
        assert_eq!(genre_id_for_label("Westerns"), DEFAULT_GENRE_ID);
    }
}
