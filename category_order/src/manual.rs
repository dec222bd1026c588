/*!

This is the long-form manual for `category_order` and `atta`.

## Ordering the categories

A count plot shows one bar per category of a column. The bars are drawn by
descending count, except for the catch-all categories which would otherwise
land somewhere in the middle of the chart:

* `Other`, `Others`, `other industries`, ... (pattern `Other|other`) are moved to the end;
* `No Record` (pattern `No Record`) is moved to the end after them.

The patterns are regular expressions, searched anywhere in the label and
case-sensitive: `OTHER` is not a catch-all category.

The rules are applied one after the other. Within one rule, the matching
labels are visited by descending count: with `Others` (40) and
`other industries` (30), `other industries` is the very last bar.

## Configuration file

The `atta` program reads an optional JSON configuration:

```json
{
  "outputSettings": {
    "reportName": "PyCon attendees",
    "year": "2019",
    "outputDirectory": "charts"
  },
  "fileSources": [
    { "provider": "csv", "filePath": "attendees.csv" },
    { "provider": "xlsx", "filePath": "late_registrations.xlsx", "excelWorksheetName": "Form1" }
  ],
  "columns": ["Title_Categories", "Country"],
  "columnTitles": { "Country": "Countries" },
  "reorderRules": [
    { "pattern": "Other|other", "placement": "back" },
    { "pattern": "No Record", "placement": "back" }
  ],
  "chart": { "width": 1200, "height": 800, "fontFamily": "AR PL UKai TW", "fontScale": 2.0 }
}
```

All the fields except `outputSettings` and `fileSources` are optional. When
`reorderRules` is absent, the two rules above are used. The file paths are
relative to the directory of the configuration file.

### Providers

* `csv`: the first line is the header.
* `xlsx`: the first row of the worksheet (the first worksheet unless
  `excelWorksheetName` is set) is the header.

Empty cells are missing values and are not counted. Spreadsheet dates read
as `YYYY-MM-DD`.

### Charts

`width` and `height` are in pixels and must be at least 300. The default
font family is `AR PL UKai TW`, a CJK font, so that Chinese category names
are drawn. When the configured family cannot be loaded, the charts use
`sans-serif` instead and a warning is logged.

## Output

One `<column>.jpg` image per column, written to the output directory (the
temporary directory by default), and a JSON summary with the final order of
each chart.

*/
