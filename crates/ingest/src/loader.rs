//! CSV loaders for the four source tables.
//!
//! Each loader resolves its columns from the header row, so column order
//! in the export does not matter. Date cells are coerced through a
//! tolerant parser (unparseable dates become `None`); any other parse
//! failure aborts the load with an error naming the table and cause, and
//! the caller keeps its previous state.

use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;
use roi_core::types::{Influencer, Payout, PayoutBasis, Post, TrackingRecord};
use roi_core::{Brand, RoiError, RoiResult};
use tracing::debug;

/// Formats accepted by the tolerant date parser, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d %b %Y",
];

/// Parse a date cell. Empty or unparseable values become `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn reader_from<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn read_headers<R: Read>(
    rdr: &mut csv::Reader<R>,
    table: &'static str,
) -> RoiResult<StringRecord> {
    rdr.headers()
        .map(|h| h.clone())
        .map_err(|source| RoiError::Csv { table, source })
}

fn column(headers: &StringRecord, table: &'static str, name: &str) -> RoiResult<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| RoiError::MissingColumn {
            table,
            column: name.to_string(),
        })
}

/// Date columns are matched by substring: the first header containing
/// `date` (case-insensitive) is the table's date column.
fn date_column(headers: &StringRecord, table: &'static str) -> RoiResult<usize> {
    headers
        .iter()
        .position(|h| h.to_ascii_lowercase().contains("date"))
        .ok_or_else(|| RoiError::MissingColumn {
            table,
            column: "date".to_string(),
        })
}

fn text(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").to_string()
}

fn parse_u64(
    record: &StringRecord,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> RoiResult<u64> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(|_| RoiError::InvalidValue {
        table,
        column,
        value: raw.to_string(),
    })
}

fn parse_f64(
    record: &StringRecord,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> RoiResult<f64> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse().map_err(|_| RoiError::InvalidValue {
        table,
        column,
        value: raw.to_string(),
    })
}

pub fn load_influencers<R: Read>(input: R) -> RoiResult<Vec<Influencer>> {
    const TABLE: &str = "influencers";
    let mut rdr = reader_from(input);
    let headers = read_headers(&mut rdr, TABLE)?;
    let id = column(&headers, TABLE, "influencer_id")?;
    let name = column(&headers, TABLE, "name")?;
    let category = column(&headers, TABLE, "category")?;
    let gender = column(&headers, TABLE, "gender")?;
    let followers = column(&headers, TABLE, "follower_count")?;
    let platform = column(&headers, TABLE, "platform")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|source| RoiError::Csv {
            table: TABLE,
            source,
        })?;
        rows.push(Influencer {
            influencer_id: text(&record, id),
            name: text(&record, name),
            category: text(&record, category),
            gender: text(&record, gender),
            follower_count: parse_u64(&record, followers, TABLE, "follower_count")?,
            platform: text(&record, platform),
        });
    }
    debug!(table = TABLE, rows = rows.len(), "CSV parsed");
    Ok(rows)
}

pub fn load_posts<R: Read>(input: R) -> RoiResult<Vec<Post>> {
    const TABLE: &str = "posts";
    let mut rdr = reader_from(input);
    let headers = read_headers(&mut rdr, TABLE)?;
    let id = column(&headers, TABLE, "influencer_id")?;
    let platform = column(&headers, TABLE, "platform")?;
    let date = date_column(&headers, TABLE)?;
    let reach = column(&headers, TABLE, "reach")?;
    let likes = column(&headers, TABLE, "likes")?;
    let comments = column(&headers, TABLE, "comments")?;
    let url = column(&headers, TABLE, "url")?;
    let caption = column(&headers, TABLE, "caption")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|source| RoiError::Csv {
            table: TABLE,
            source,
        })?;
        rows.push(Post {
            influencer_id: text(&record, id),
            platform: text(&record, platform),
            date: parse_date(record.get(date).unwrap_or("")),
            reach: parse_u64(&record, reach, TABLE, "reach")?,
            likes: parse_u64(&record, likes, TABLE, "likes")?,
            comments: parse_u64(&record, comments, TABLE, "comments")?,
            url: text(&record, url),
            caption: text(&record, caption),
        });
    }
    debug!(table = TABLE, rows = rows.len(), "CSV parsed");
    Ok(rows)
}

pub fn load_tracking<R: Read>(input: R) -> RoiResult<Vec<TrackingRecord>> {
    const TABLE: &str = "tracking_data";
    let mut rdr = reader_from(input);
    let headers = read_headers(&mut rdr, TABLE)?;
    let id = column(&headers, TABLE, "influencer_id")?;
    let source = column(&headers, TABLE, "source")?;
    let campaign = column(&headers, TABLE, "campaign")?;
    let product = column(&headers, TABLE, "product")?;
    let date = date_column(&headers, TABLE)?;
    let revenue = column(&headers, TABLE, "revenue")?;
    let orders = column(&headers, TABLE, "orders")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|source| RoiError::Csv {
            table: TABLE,
            source,
        })?;
        let product_name = text(&record, product);
        rows.push(TrackingRecord {
            influencer_id: text(&record, id),
            source: text(&record, source),
            campaign: text(&record, campaign),
            brand: Brand::classify(&product_name),
            product: product_name,
            date: parse_date(record.get(date).unwrap_or("")),
            revenue: parse_f64(&record, revenue, TABLE, "revenue")?,
            orders: parse_u64(&record, orders, TABLE, "orders")?,
        });
    }
    debug!(table = TABLE, rows = rows.len(), "CSV parsed");
    Ok(rows)
}

pub fn load_payouts<R: Read>(input: R) -> RoiResult<Vec<Payout>> {
    const TABLE: &str = "payouts";
    let mut rdr = reader_from(input);
    let headers = read_headers(&mut rdr, TABLE)?;
    let id = column(&headers, TABLE, "influencer_id")?;
    let campaign = column(&headers, TABLE, "campaign")?;
    let basis = column(&headers, TABLE, "basis")?;
    let date = date_column(&headers, TABLE)?;
    let total = column(&headers, TABLE, "total_payout")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|source| RoiError::Csv {
            table: TABLE,
            source,
        })?;
        let raw_basis = text(&record, basis);
        let basis = PayoutBasis::parse(&raw_basis).ok_or(RoiError::InvalidValue {
            table: TABLE,
            column: "basis",
            value: raw_basis,
        })?;
        rows.push(Payout {
            influencer_id: text(&record, id),
            campaign: text(&record, campaign),
            basis,
            payout_date: parse_date(record.get(date).unwrap_or("")),
            total_payout: parse_f64(&record, total, TABLE, "total_payout")?,
        });
    }
    debug!(table = TABLE, rows = rows.len(), "CSV parsed");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("2024-03-05"), Some(expected));
        assert_eq!(parse_date("05-03-2024"), Some(expected));
        assert_eq!(parse_date("05/03/2024"), Some(expected));
        assert_eq!(parse_date("2024/03/05"), Some(expected));
        assert_eq!(parse_date("5 Mar 2024"), Some(expected));
    }

    #[test]
    fn test_parse_date_unparseable_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_load_influencers() {
        let csv = "influencer_id,name,category,gender,follower_count,platform\n\
                   I1,Asha,Fitness,Female,120000,Instagram\n\
                   I2,Ravi,Nutrition,Male,80000,YouTube\n";
        let rows = load_influencers(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].influencer_id, "I1");
        assert_eq!(rows[1].follower_count, 80_000);
    }

    #[test]
    fn test_load_influencers_missing_column() {
        let csv = "influencer_id,name,category,gender,platform\nI1,Asha,Fitness,Female,Instagram\n";
        let err = load_influencers(csv.as_bytes()).unwrap_err();
        match err {
            RoiError::MissingColumn { table, column } => {
                assert_eq!(table, "influencers");
                assert_eq!(column, "follower_count");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_tracking_derives_brand() {
        let csv = "influencer_id,source,campaign,product,date,revenue,orders\n\
                   I1,Influencer Campaign,C1,MuscleBlaze Whey,2024-01-10,10000,25\n\
                   I2,Organic,C1,Unknown Shaker,2024-01-11,500,2\n";
        let rows = load_tracking(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].brand, Brand::MuscleBlaze);
        assert_eq!(rows[1].brand, Brand::Other);
        assert_eq!(rows[0].revenue, 10_000.0);
    }

    #[test]
    fn test_load_tracking_bad_date_becomes_none() {
        let csv = "influencer_id,source,campaign,product,date,revenue,orders\n\
                   I1,Influencer Campaign,C1,Gritzo SuperMilk,garbage,100,1\n";
        let rows = load_tracking(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].date, None);
    }

    #[test]
    fn test_load_tracking_bad_revenue_is_error() {
        let csv = "influencer_id,source,campaign,product,date,revenue,orders\n\
                   I1,Influencer Campaign,C1,Gritzo SuperMilk,2024-01-10,abc,1\n";
        let err = load_tracking(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RoiError::InvalidValue { column: "revenue", .. }));
    }

    #[test]
    fn test_load_payouts_date_column_by_substring() {
        let csv = "influencer_id,campaign,basis,payout_date,total_payout\n\
                   I1,C1,post,2024-02-01,2000\n\
                   I2,C2,order,,1500.50\n";
        let rows = load_payouts(csv.as_bytes()).unwrap();
        assert_eq!(
            rows[0].payout_date,
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(rows[0].basis, PayoutBasis::Post);
        assert_eq!(rows[1].payout_date, None);
        assert_eq!(rows[1].total_payout, 1500.50);
    }

    #[test]
    fn test_load_payouts_unknown_basis_is_error() {
        let csv = "influencer_id,campaign,basis,payout_date,total_payout\n\
                   I1,C1,per-click,2024-02-01,2000\n";
        let err = load_payouts(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RoiError::InvalidValue { column: "basis", .. }));
    }

    #[test]
    fn test_ragged_row_is_error() {
        let csv = "influencer_id,name,category,gender,follower_count,platform\n\
                   I1,Asha,Fitness\n";
        assert!(matches!(
            load_influencers(csv.as_bytes()),
            Err(RoiError::Csv { table: "influencers", .. })
        ));
    }
}
