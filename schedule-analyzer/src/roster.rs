use common::models::Team;

/// League roster, numeric franchise id and 3-letter code. The order here is
/// the tie-break order for equal-count teams in every ranking.
const NHL_TEAMS: &[(u32, &str)] = &[
    (1, "NJD"),
    (2, "NYI"),
    (3, "NYR"),
    (4, "PHI"),
    (5, "PIT"),
    (6, "BOS"),
    (7, "BUF"),
    (8, "MTL"),
    (9, "OTT"),
    (10, "TOR"),
    (13, "FLA"),
    (14, "TBL"),
    (12, "CAR"),
    (15, "WSH"),
    (16, "CHI"),
    (17, "DET"),
    (18, "NSH"),
    (19, "STL"),
    (20, "CGY"),
    (21, "COL"),
    (22, "EDM"),
    (23, "VAN"),
    (24, "ANA"),
    (25, "DAL"),
    (26, "LAK"),
    (28, "SJS"),
    (29, "CBJ"),
    (30, "MIN"),
    (52, "WPG"),
    (54, "VGK"),
    (55, "SEA"),
    (59, "UTA"),
];

pub fn default_roster() -> Vec<Team> {
    NHL_TEAMS
        .iter()
        .map(|&(id, code)| Team {
            id,
            code: code.to_string(),
        })
        .collect()
}
