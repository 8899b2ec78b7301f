// A small election used by the tests of several modules.

use serde_json::{json, Value as JSValue};

pub fn sample_root() -> JSValue {
    json!({
        "languages": ["en", "es"],
        "translations": {"en": {"results": "Results"}},
        "result_stat_types": [
            {"_id": "RSReg", "heading": {"en": "Registered Voters"}, "is_percent": "N"},
            {"_id": "RSCst", "heading": {"en": "Ballots Cast"}},
            {"_id": "RSCnt", "heading": {"en": "Continuing Ballots"}}
        ],
        "voting_groups": [
            {"_id": "EV", "heading": {"en": "Election Day"}},
            {"_id": "MV", "heading": {"en": "Vote by Mail"}}
        ],
        "result_styles": [
            {
                "_id": "RS",
                "is_rcv": "N",
                "voting_group_ids": "EV MV",
                "result_stat_type_ids": "RSReg RSCst"
            },
            {
                "_id": "RSRCV",
                "is_rcv": "Y",
                "voting_group_ids": "EV MV",
                "result_stat_type_ids": "RSCst RSCnt"
            }
        ],
        "areas": [
            {"_id": "ALL", "name": {"en": "County"}, "reporting_group_ids": "P1 P2"},
            {"_id": "P1", "short_name": {"en": "Pct 1"}, "is_vbm": "N"},
            {"_id": "P2", "short_name": {"en": "Pct 2"}, "is_vbm": "Y"},
            {"_id": "D1", "classification": "District"}
        ],
        "election": {
            "ballot_title": {"en": "Consolidated Election"},
            "election_date": "2018-06-05",
            "election_area": {"en": "County"},
            "headers": [
                {"_id": "H1", "ballot_title": {"en": "Local"}, "header_id": ""},
                {"_id": "H2", "ballot_title": {"en": "City"}, "header_id": "H1"}
            ],
            "contests": [
                {
                    "_id": "C1",
                    "_type": "office",
                    "ballot_title": {"en": "Mayor"},
                    "header_id": "H2",
                    "result_style": "RSRCV",
                    "voting_district": "ALL",
                    "number_elected": 1,
                    "choices": [
                        {"_id": "101", "ballot_title": "ALICE"},
                        {"_id": "102", "ballot_title": "BOB"},
                        {"_id": "103", "ballot_title": "CAROL"},
                        {"_id": "104", "ballot_title": "DAVE"}
                    ]
                },
                {
                    "_id": "M1",
                    "_type": "measure",
                    "ballot_title": {"en": "Measure A"},
                    "header_id": "H1",
                    "result_style": "RS",
                    "voting_district": "D1",
                    "choices": [
                        {"_id": "M1Y", "ballot_title": "Yes"},
                        {"_id": "M1N", "ballot_title": "No"}
                    ]
                }
            ]
        }
    })
}

/// The RCV rounds of contest C1, first round first. The continuing ballots
/// are in the second column.
pub fn sample_rcv_totals() -> Vec<Vec<Option<i64>>> {
    vec![
        vec![Some(10000), Some(2000), Some(600), Some(800), Some(400), Some(200)],
        vec![Some(10000), Some(1900), Some(650), Some(820), Some(430), None],
        vec![Some(10000), Some(1850), None, Some(1120), Some(730), None],
    ]
}
