//! Catalog feed and collaborator file loaders.
//!
//! The catalog feed is read from CSV (with headers), from a JSON array of
//! objects, or from the storefront's XML export (one `<Product>` element per
//! record, fields as child elements). Every field is kept as text: numbers
//! in a JSON feed are rendered back to their literal form, `null` and
//! missing fields become empty strings. Column names may be the English
//! ones below or the storefront export's original names.
//!
//! Feed columns:
//!   id, name, sku, total_stock, size_stock, category, season,
//!   active_size_ratio, current_price
//!
//! Order-line columns: sku, quantity, size
//! Listing-date columns: sku, listing_date

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use repricer_engine::sales::OrderLine;
use repricer_engine::size_stock::SizeStock;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{LoadError, LoadResult};
use crate::types::ProductCandidate;

/// One product record from the catalog feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogFeedRecord {
    #[serde(alias = "IdUrun")]
    pub id: String,
    #[serde(alias = "UrunAdi")]
    pub name: String,
    #[serde(alias = "StokKodu")]
    pub sku: String,
    #[serde(alias = "SatistakiStokAdedi")]
    pub total_stock: String,
    #[serde(alias = "SatistaOlduguGunlerVeBedenlerinSatistakiStokAdetleri")]
    pub size_stock: String,
    #[serde(alias = "Kategori")]
    pub category: String,
    #[serde(alias = "Mevsim")]
    pub season: String,
    #[serde(alias = "UrununAktifBedenOrani")]
    pub active_size_ratio: String,
    #[serde(alias = "GuncelSatisFiyati")]
    pub current_price: String,
}

impl CatalogFeedRecord {
    /// Build the pipeline candidate for this record. The raw size-stock is
    /// decoded strictly here so later stages never re-parse it.
    pub fn to_candidate(&self, position: usize) -> ProductCandidate {
        ProductCandidate {
            position,
            id: self.id.clone(),
            name: self.name.clone(),
            sku: self.sku.clone(),
            total_stock: self.total_stock.clone(),
            size_stock: self.size_stock.clone(),
            category: self.category.clone(),
            season: self.season.clone(),
            active_size_ratio: self.active_size_ratio.clone(),
            current_price: self.current_price.clone(),
            raw_sizes: SizeStock::decode_strict(&self.size_stock).ok(),
            ..ProductCandidate::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OrderLineRecord {
    #[serde(alias = "StokKodu")]
    sku: String,
    #[serde(alias = "Adet")]
    quantity: String,
    #[serde(alias = "Varyant")]
    size: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ListingDateRecord {
    #[serde(alias = "StokKodu")]
    sku: String,
    #[serde(alias = "SatisaGirmeTarihi")]
    listing_date: String,
}

/// Element wrapping one record in the XML feed.
const XML_PRODUCT: &str = "Product";

/// Feed file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Csv,
    Json,
    Xml,
}

impl FeedFormat {
    /// `.json` and `.xml` files by extension, anything else is treated as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FeedFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("xml") => FeedFormat::Xml,
            _ => FeedFormat::Csv,
        }
    }
}

/// Load feed records from a reader.
pub fn load_feed<R: Read>(reader: R, format: FeedFormat) -> LoadResult<Vec<CatalogFeedRecord>> {
    match format {
        FeedFormat::Csv => read_csv(reader),
        FeedFormat::Json => read_json_feed(reader),
        FeedFormat::Xml => read_xml_feed(reader),
    }
}

/// Load feed records from a file, picking the format from its extension.
pub fn load_feed_file(path: &Path) -> LoadResult<Vec<CatalogFeedRecord>> {
    load_feed(open(path)?, FeedFormat::from_path(path))
}

/// Load and concatenate several feeds, in the order given.
pub fn load_feed_files<P: AsRef<Path>>(paths: &[P]) -> LoadResult<Vec<CatalogFeedRecord>> {
    let mut records = Vec::new();
    for path in paths {
        let mut loaded = load_feed_file(path.as_ref())?;
        log::info!("loaded {} feed records from {}", loaded.len(), path.as_ref().display());
        records.append(&mut loaded);
    }
    Ok(records)
}

/// Load order lines from a CSV reader.
pub fn load_order_lines<R: Read>(reader: R) -> LoadResult<Vec<OrderLine>> {
    let records: Vec<OrderLineRecord> = read_csv(reader)?;
    Ok(records
        .into_iter()
        .map(|r| OrderLine {
            sku: r.sku,
            quantity: r.quantity,
            size: r.size,
        })
        .collect())
}

pub fn load_order_lines_file(path: &Path) -> LoadResult<Vec<OrderLine>> {
    load_order_lines(open(path)?)
}

/// Load a SKU -> listing date map from a CSV reader. Rows without a date
/// are skipped; on duplicate SKUs the first row wins.
pub fn load_listing_dates<R: Read>(reader: R) -> LoadResult<HashMap<String, String>> {
    let records: Vec<ListingDateRecord> = read_csv(reader)?;
    let mut dates = HashMap::new();
    for record in records {
        if record.sku.is_empty() || record.listing_date.is_empty() {
            continue;
        }
        dates.entry(record.sku).or_insert(record.listing_date);
    }
    Ok(dates)
}

pub fn load_listing_dates_file(path: &Path) -> LoadResult<HashMap<String, String>> {
    load_listing_dates(open(path)?)
}

fn open(path: &Path) -> LoadResult<File> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })
}

fn read_csv<R: Read, T: DeserializeOwned>(reader: R) -> LoadResult<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let record: T = result.map_err(|source| LoadError::Csv {
            line: line_num + 2,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

fn read_json_feed<R: Read>(reader: R) -> LoadResult<Vec<CatalogFeedRecord>> {
    let value: Value = serde_json::from_reader(reader)?;
    let items = match value {
        Value::Array(items) => items,
        other => return Err(LoadError::JsonShape(json_kind(&other).to_string())),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => {
                let fields = fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(json_text(value))))
                    .collect();
                Ok(serde_json::from_value(Value::Object(fields))?)
            }
            other => Err(LoadError::JsonShape(format!("an array containing {}", json_kind(&other)))),
        })
        .collect()
}

/// Collect every `<Product>` element, at any depth, into a record. Direct
/// children of a product are its fields; the first occurrence of a field
/// wins and a missing field is empty. Unknown children are ignored.
fn read_xml_feed<R: Read>(reader: R) -> LoadResult<Vec<CatalogFeedRecord>> {
    let mut xml = Reader::from_reader(BufReader::new(reader));
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut open: Vec<String> = Vec::new();
    // depth of the open <Product> and the fields read so far
    let mut product: Option<(usize, Map<String, Value>)> = None;
    let mut field: Option<(String, String)> = None;
    let mut records = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(start) => {
                let name = element_name(start.local_name().as_ref());
                let depth = open.len();
                match product.as_ref().map(|(product_depth, _)| *product_depth) {
                    None if name == XML_PRODUCT => product = Some((depth, Map::new())),
                    Some(product_depth) if depth == product_depth + 1 => {
                        field = Some((name.clone(), String::new()));
                    }
                    _ => {}
                }
                open.push(name);
            }
            Event::Empty(start) => {
                let name = element_name(start.local_name().as_ref());
                let depth = open.len();
                match product.as_mut() {
                    None if name == XML_PRODUCT => records.push(CatalogFeedRecord::default()),
                    Some((product_depth, fields)) if depth == *product_depth + 1 => {
                        fields.entry(name).or_insert(Value::String(String::new()));
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                if let Some((key, value)) = field.as_mut() {
                    let text = text
                        .unescape()
                        .map_err(|err| LoadError::XmlShape(format!("bad text in <{}>: {}", key, err)))?;
                    value.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(end) => {
                let name = element_name(end.local_name().as_ref());
                match open.pop() {
                    Some(expected) if expected == name => {}
                    Some(expected) => {
                        return Err(LoadError::XmlShape(format!(
                            "</{}> closes <{}>",
                            name, expected
                        )))
                    }
                    None => return Err(LoadError::XmlShape(format!("unmatched </{}>", name))),
                }
                let depth = open.len();
                match product.as_ref().map(|(product_depth, _)| *product_depth) {
                    Some(product_depth) if depth == product_depth + 1 => {
                        if let (Some((key, value)), Some((_, fields))) = (field.take(), product.as_mut()) {
                            fields.entry(key).or_insert(Value::String(value.trim().to_string()));
                        }
                    }
                    Some(product_depth) if depth == product_depth => {
                        if let Some((_, fields)) = product.take() {
                            records.push(serde_json::from_value(Value::Object(fields))?);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(name) = open.last() {
        return Err(LoadError::XmlShape(format!("<{}> is never closed", name)));
    }
    Ok(records)
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Text form of a JSON scalar. Nested values keep their JSON rendering.
fn json_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_CSV: &str = "\
id,name,sku,total_stock,size_stock,category,season,active_size_ratio,current_price
1,Linen Shirt,LS.100.WHT.S,90,S : 20 // M : 40 // L : 30,Shirts,SS24,80,299.90
2,Denim Jacket,DJ.200.BLU.M,12,S : 2 // M : 5 // L : 5,Jackets,AW23,60,\"1.249,00\"
";

    #[test]
    fn load_sample_csv() {
        let records = load_feed(SAMPLE_CSV.as_bytes(), FeedFormat::Csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sku, "LS.100.WHT.S");
        assert_eq!(records[0].size_stock, "S : 20 // M : 40 // L : 30");
        assert_eq!(records[1].current_price, "1.249,00");
    }

    #[test]
    fn original_column_names_are_accepted() {
        let csv_data = "\
IdUrun,UrunAdi,StokKodu,SatistakiStokAdedi,SatistaOlduguGunlerVeBedenlerinSatistakiStokAdetleri,UrununAktifBedenOrani,GuncelSatisFiyati
9,Etek,ET.1.2.36,40,36 : 10 // 38 : 20 // 40 : 10,75,\"349,90\"
";
        let records = load_feed(csv_data.as_bytes(), FeedFormat::Csv).unwrap();
        assert_eq!(records[0].id, "9");
        assert_eq!(records[0].total_stock, "40");
        assert_eq!(records[0].active_size_ratio, "75");
        assert_eq!(records[0].category, "");
    }

    #[test]
    fn leading_zeros_survive_csv() {
        let csv_data = "id,sku,total_stock\n007,0012.A.B,030\n";
        let records = load_feed(csv_data.as_bytes(), FeedFormat::Csv).unwrap();
        assert_eq!(records[0].id, "007");
        assert_eq!(records[0].total_stock, "030");
    }

    #[test]
    fn json_feed_renders_numbers_as_text() {
        let json = r#"[
            {"id": 5, "sku": "A.B.C", "total_stock": 30, "current_price": 199.9,
             "size_stock": "S : 1 // M : 2 // L : 3", "season": null}
        ]"#;
        let records = load_feed(json.as_bytes(), FeedFormat::Json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "5");
        assert_eq!(records[0].total_stock, "30");
        assert_eq!(records[0].current_price, "199.9");
        assert_eq!(records[0].season, "");
        assert_eq!(records[0].name, "");
    }

    #[test]
    fn json_feed_must_be_an_array() {
        let err = load_feed(r#"{"id": 1}"#.as_bytes(), FeedFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::JsonShape(_)));
    }

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Root>
  <Products>
    <Product>
      <IdUrun>41</IdUrun>
      <UrunAdi><![CDATA[Keten Gömlek & Şort]]></UrunAdi>
      <StokKodu> KG.10.BEJ.S </StokKodu>
      <SatistakiStokAdedi>62</SatistakiStokAdedi>
      <SatistaOlduguGunlerVeBedenlerinSatistakiStokAdetleri>S : 40 // M : 12 // L : 10</SatistaOlduguGunlerVeBedenlerinSatistakiStokAdetleri>
      <Kategori>Gömlek</Kategori>
      <UrununAktifBedenOrani>75</UrununAktifBedenOrani>
      <GuncelSatisFiyati>349,90</GuncelSatisFiyati>
      <Etiket>ignored</Etiket>
    </Product>
    <Product>
      <IdUrun>42</IdUrun>
      <Mevsim/>
      <UrunAdi>Fit &amp; Flare</UrunAdi>
    </Product>
  </Products>
</Root>
"#;

    #[test]
    fn xml_feed_maps_original_element_names() {
        let records = load_feed(SAMPLE_XML.as_bytes(), FeedFormat::Xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "41");
        assert_eq!(records[0].name, "Keten Gömlek & Şort");
        assert_eq!(records[0].sku, "KG.10.BEJ.S");
        assert_eq!(records[0].size_stock, "S : 40 // M : 12 // L : 10");
        assert_eq!(records[0].current_price, "349,90");
        assert_eq!(records[0].season, "");
    }

    #[test]
    fn xml_missing_elements_are_empty() {
        let records = load_feed(SAMPLE_XML.as_bytes(), FeedFormat::Xml).unwrap();
        assert_eq!(
            records[1],
            CatalogFeedRecord {
                id: "42".into(),
                name: "Fit & Flare".into(),
                ..CatalogFeedRecord::default()
            }
        );
    }

    #[test]
    fn xml_without_products_is_empty() {
        let records = load_feed("<Root><Other>1</Other></Root>".as_bytes(), FeedFormat::Xml).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let mismatched = "<Root><Product><IdUrun>1</UrunAdi></Product></Root>";
        assert!(load_feed(mismatched.as_bytes(), FeedFormat::Xml).is_err());

        let truncated = "<Root><Product><IdUrun>1</IdUrun>";
        assert!(load_feed(truncated.as_bytes(), FeedFormat::Xml).is_err());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(FeedFormat::from_path(Path::new("feed.JSON")), FeedFormat::Json);
        assert_eq!(FeedFormat::from_path(Path::new("urunler.xml")), FeedFormat::Xml);
        assert_eq!(FeedFormat::from_path(Path::new("feed.csv")), FeedFormat::Csv);
        assert_eq!(FeedFormat::from_path(Path::new("feed")), FeedFormat::Csv);
    }

    #[test]
    fn candidate_carries_strictly_decoded_sizes() {
        let records = load_feed(SAMPLE_CSV.as_bytes(), FeedFormat::Csv).unwrap();
        let candidate = records[0].to_candidate(3);
        assert_eq!(candidate.position, 3);
        assert_eq!(candidate.raw_sizes.map(|s| s.encode()).as_deref(), Some("S : 20 // M : 40 // L : 30"));

        let broken = CatalogFeedRecord {
            size_stock: "S : x // M : 1 // L : 2".into(),
            ..CatalogFeedRecord::default()
        };
        assert!(broken.to_candidate(0).raw_sizes.is_none());
    }

    #[test]
    fn order_lines_accept_original_headers() {
        let csv_data = "StokKodu,Adet,Varyant\nKZ.1.2.36,\"1,5\",Beden: 36\n";
        let lines = load_order_lines(csv_data.as_bytes()).unwrap();
        assert_eq!(
            lines,
            vec![OrderLine {
                sku: "KZ.1.2.36".into(),
                quantity: "1,5".into(),
                size: "Beden: 36".into(),
            }]
        );
    }

    #[test]
    fn listing_dates_skip_blank_rows() {
        let csv_data = "sku,listing_date\nA,2024-01-02\nB,\nA,2025-01-01\n";
        let dates = load_listing_dates(csv_data.as_bytes()).unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates.get("A").map(String::as_str), Some("2024-01-02"));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = load_feed_file(Path::new("/nonexistent/feed.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/feed.csv"));
    }
}
