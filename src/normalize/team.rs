//! Team normalization.
//!
//! Maps full franchise names and the inconsistent abbreviations used across
//! platforms onto one canonical code table. Las Vegas is canonically `LV`;
//! the alternate `LAS`/`LVR`/`OAK` codes all map to it.

/// Canonical code for an unknown or missing team.
pub const UNKNOWN_TEAM: &str = "UNKNOWN";

/// Full franchise names mapped to canonical codes.
const FRANCHISES: &[(&str, &str)] = &[
    ("ARIZONA CARDINALS", "ARI"),
    ("ATLANTA FALCONS", "ATL"),
    ("BALTIMORE RAVENS", "BAL"),
    ("BUFFALO BILLS", "BUF"),
    ("CAROLINA PANTHERS", "CAR"),
    ("CHICAGO BEARS", "CHI"),
    ("CINCINNATI BENGALS", "CIN"),
    ("CLEVELAND BROWNS", "CLE"),
    ("DALLAS COWBOYS", "DAL"),
    ("DENVER BRONCOS", "DEN"),
    ("DETROIT LIONS", "DET"),
    ("GREEN BAY PACKERS", "GB"),
    ("HOUSTON TEXANS", "HOU"),
    ("INDIANAPOLIS COLTS", "IND"),
    ("JACKSONVILLE JAGUARS", "JAC"),
    ("KANSAS CITY CHIEFS", "KC"),
    ("LAS VEGAS RAIDERS", "LV"),
    ("LOS ANGELES CHARGERS", "LAC"),
    ("LOS ANGELES RAMS", "LAR"),
    ("MIAMI DOLPHINS", "MIA"),
    ("MINNESOTA VIKINGS", "MIN"),
    ("NEW ENGLAND PATRIOTS", "NE"),
    ("NEW ORLEANS SAINTS", "NO"),
    ("NEW YORK GIANTS", "NYG"),
    ("NEW YORK JETS", "NYJ"),
    ("PHILADELPHIA EAGLES", "PHI"),
    ("PITTSBURGH STEELERS", "PIT"),
    ("SAN FRANCISCO 49ERS", "SF"),
    ("SEATTLE SEAHAWKS", "SEA"),
    ("TAMPA BAY BUCCANEERS", "TB"),
    ("TENNESSEE TITANS", "TEN"),
    ("WASHINGTON COMMANDERS", "WAS"),
];

/// Franchise cities, used by the placeholder filter to spot `"City, Team"`
/// organizational entries.
pub(crate) const FRANCHISE_CITIES: &[&str] = &[
    "ARIZONA",
    "ATLANTA",
    "BALTIMORE",
    "BUFFALO",
    "CAROLINA",
    "CHICAGO",
    "CINCINNATI",
    "CLEVELAND",
    "DALLAS",
    "DENVER",
    "DETROIT",
    "GREEN BAY",
    "HOUSTON",
    "INDIANAPOLIS",
    "JACKSONVILLE",
    "KANSAS CITY",
    "LAS VEGAS",
    "LOS ANGELES",
    "MIAMI",
    "MINNESOTA",
    "NEW ENGLAND",
    "NEW ORLEANS",
    "NEW YORK",
    "PHILADELPHIA",
    "PITTSBURGH",
    "SAN FRANCISCO",
    "SEATTLE",
    "TAMPA BAY",
    "TENNESSEE",
    "WASHINGTON",
];

/// Franchise nicknames, used by the placeholder filter for defense entries.
pub(crate) const FRANCHISE_NICKNAMES: &[&str] = &[
    "CARDINALS",
    "FALCONS",
    "RAVENS",
    "BILLS",
    "PANTHERS",
    "BEARS",
    "BENGALS",
    "BROWNS",
    "COWBOYS",
    "BRONCOS",
    "LIONS",
    "PACKERS",
    "TEXANS",
    "COLTS",
    "JAGUARS",
    "CHIEFS",
    "RAIDERS",
    "CHARGERS",
    "RAMS",
    "DOLPHINS",
    "VIKINGS",
    "PATRIOTS",
    "SAINTS",
    "GIANTS",
    "JETS",
    "EAGLES",
    "STEELERS",
    "49ERS",
    "SEAHAWKS",
    "BUCCANEERS",
    "TITANS",
    "COMMANDERS",
];

/// Looks up a canonical code for a full franchise name.
pub(crate) fn franchise_code(name_upper: &str) -> Option<&'static str> {
    FRANCHISES
        .iter()
        .find(|(full, _)| *full == name_upper)
        .map(|(_, code)| *code)
}

fn code_synonym(code: &str) -> Option<&'static str> {
    Some(match code {
        "WSH" => "WAS",
        "JAX" => "JAC",
        // Las Vegas: LV is canonical, alternates fold into it.
        "LAS" | "LVR" | "OAK" => "LV",
        "GBP" => "GB",
        "KCC" => "KC",
        "NEP" => "NE",
        "NOS" => "NO",
        "SFO" => "SF",
        "TBB" => "TB",
        // Nickname-only forms some feeds emit.
        "JAGUARS" => "JAC",
        "RAIDERS" => "LV",
        "CHIEFS" => "KC",
        "PACKERS" => "GB",
        "PATRIOTS" => "NE",
        "SAINTS" => "NO",
        "49ERS" => "SF",
        "BUCS" | "BUCCANEERS" => "TB",
        "COMMANDERS" => "WAS",
        _ => return None,
    })
}

/// Normalizes a team name or abbreviation into its canonical code.
///
/// Full franchise names and known abbreviation synonyms map to the canonical
/// table; empty input maps to [`UNKNOWN_TEAM`]; anything else passes through
/// uppercased.
#[must_use]
pub fn normalize_team(raw: &str) -> String {
    let team = raw.trim().to_uppercase();
    if team.is_empty() {
        return UNKNOWN_TEAM.to_string();
    }
    if let Some(code) = franchise_code(&team) {
        return code.to_string();
    }
    if let Some(code) = code_synonym(&team) {
        return code.to_string();
    }
    team
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_names_map_to_codes() {
        assert_eq!(normalize_team("Washington Commanders"), "WAS");
        assert_eq!(normalize_team("Buffalo Bills"), "BUF");
        assert_eq!(normalize_team("San Francisco 49ers"), "SF");
    }

    #[test]
    fn abbreviation_synonyms_converge() {
        assert_eq!(normalize_team("WSH"), "WAS");
        assert_eq!(normalize_team("WAS"), "WAS");
        assert_eq!(normalize_team("JAX"), "JAC");
        assert_eq!(normalize_team("GBP"), "GB");
    }

    #[test]
    fn las_vegas_alternates_fold_into_lv() {
        assert_eq!(normalize_team("LV"), "LV");
        assert_eq!(normalize_team("LAS"), "LV");
        assert_eq!(normalize_team("LVR"), "LV");
        assert_eq!(normalize_team("OAK"), "LV");
        assert_eq!(normalize_team("Las Vegas Raiders"), "LV");
        assert_eq!(normalize_team("RAIDERS"), "LV");
    }

    #[test]
    fn empty_is_unknown_and_unmapped_passes_through() {
        assert_eq!(normalize_team(""), UNKNOWN_TEAM);
        assert_eq!(normalize_team("  "), UNKNOWN_TEAM);
        assert_eq!(normalize_team("XFL1"), "XFL1");
    }

    #[test]
    fn idempotent_over_canonical_codes() {
        for (_, code) in FRANCHISES {
            assert_eq!(normalize_team(code), *code);
        }
    }
}
