/*!

# Working with roll-call datasets

The `cohesion` program reads one CSV file per analysis. The first row names
the columns; every other row is one legislator's votes. Poll columns hold the
vote sentinels (`1` for yes, `0` for no, anything else for a null vote: an
abstention or an absence). When the three metadata columns `name`, `party`
and `state` are all present, they are split out and become available for
filtering and grouping; a file without them is treated as pure vote data.

```text
name,party,state,poll1,poll2
Joao,PT,PB,1,1
Pedro,PSOL,PE,0,
```

**Computing a metric.** The `--metric` flag selects `rice_index` or
`adjusted_rice_index`. The output is a CSV with one column per poll and a
single data row of scores. A poll whose metric is undefined (no counted
votes, or a sample too small for the adjustment) shows as an empty cell:

```bash
cohesion --input votes.csv --metric adjusted_rice_index
```

**Narrowing the dataset.** The repeatable `--name`, `--party` and `--state`
flags keep only the matching rows; several values for the same flag combine
with OR, distinct flags with AND. `--majority-percentual 0.9` drops the
polls where a single vote value reaches 90% of the counted votes, which
removes near-unanimous procedural polls from the average:

```bash
cohesion --input votes.csv --metric rice_index \
    --party PT --party PSOL --majority-percentual 0.9
```

**Grouping.** `--groupby party` collapses each party's rows into one
representative row per poll (the most frequent non-null vote). Combined with
a metric this scores cohesion *between* groups; without a metric the grouped
table itself is written, with the group key as the leading column:

```bash
cohesion --input votes.csv --groupby party
```

**Output.** Results go to stdout, or to the file given with `--out`. A path
ending in `.json` switches to a JSON summary of the same content.

*/
