/*!

This is the long-form manual for `election_graph` and `elrep`.

## The election file

The election file is a JSON object with the following keys. Any other key
is rejected.

* `languages`, `translations`: kept as is, for the rendering step
* `result_stat_types`: the statistics reported for contests (registered
  voters, ballots cast, continuing ballots, ...)
* `voting_groups`: how the ballots were cast (election day, vote by mail, ...)
* `result_styles`: which statistics and voting groups apply to a contest
* `areas`: precincts and districts
* `election`: the election itself, with its headers and contests

The tables are loaded in this order. A result style may only refer to stat
types and voting groups, a contest may refer to any of the tables.

Every record carries its id under `_id`. Ids may be strings or integers;
integers are read as their decimal representation. A record with a key that
is not listed below is rejected, so that no information is silently dropped.

### Values

| kind     | accepted values                                                   |
|----------|-------------------------------------------------------------------|
| integer  | a JSON integer or a base-10 string. Empty means not set.          |
| boolean  | `Y`, `T`, `1`... / `N`, `F`, `0`..., a JSON boolean or an integer. Empty means not set. |
| date     | `YYYY-MM-DD`                                                      |
| time     | `YYYY-MM-DD HH:MM:SS`                                             |
| id list  | a space-separated string (`"EV MV"`) or a JSON array              |
| text     | anything, usually an object keyed by language code                |

### `result_stat_types`

`_id`, `heading` (text), `is_percent` (boolean)

### `voting_groups`

`_id`, `heading` (text)

### `result_styles`

`_id`, `description` (text), `is_rcv` (boolean), `voting_group_ids` (id
list), `result_stat_type_ids` (id list). The order of the stat types is the
order of the columns in the results files.

### `areas`

`_id`, `classification`, `name`, `short_name` (text), `is_vbm` (boolean),
`consolidated_ids`, `reporting_group_ids` (id list).

`reporting_group_ids` lists the areas whose results are reported separately
for the contests of this district. When it is empty, the district is its own
single reporting area.

### `election`

`ballot_title`, `election_date` (date), `election_area`, `headers`,
`contests`.

Headers have `_id`, `ballot_title`, `classification` and `header_id`, the id
of the parent header. Contests are placed under a header with `header_id` as
well. An empty or missing `header_id` puts the item at the top of the ballot.
A header cannot be its own ancestor.

Contests have a `_type`: `office` (the choices are candidates, with
`ballot_title`, `ballot_designation` and `candidate_party`), `measure` or
`ynoffice` (the choices only have a `ballot_title`). The other keys are
`ballot_subtitle`, `ballot_title`, `choice_names`, `choices`,
`instructions_text`, `is_partisan`, `number_elected`, `question_text`,
`result_style` (required), `voting_district`, `type`, `vote_for_msg`,
`writeins_allowed` (integer).

## The result files

### Contest status

`resultdata/contest-status.json` is a list of objects, one per contest, with
the keys `_id`, `reporting_time` (time), `total_precincts`,
`precincts_reporting` and `rcv_rounds` (integers). Other keys are ignored.

### Detailed results

`resultdata/results-<contest id>.tsv` has a header line, then:
* for RCV contests, one row per round starting with the last one, labelled
  `RCV3`, `RCV2`, `RCV1`. A candidate who was eliminated has an empty cell.
* one row per reporting group: for each reporting area of the district, one
  row per voting group of the result style.

Each row has two label columns, then one column per stat type of the result
style, then one column per choice. The delimiter is detected from the header
line (tab, `|` or `,`).

*/
