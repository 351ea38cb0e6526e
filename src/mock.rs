use chrono::{Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::constants::SHIPPING_POLICY_UNSPECIFIED;

// Demo catalog vocabulary, cycled by index so repeated runs produce the
// same shape of data
const NAMES: &[&str] = &[
    "오버핏 셔츠",
    "슬림 팬츠",
    "베이직 후드",
    "롱 코트",
    "니트 가디건",
    "와이드 슬랙스",
    "크롭 티셔츠",
    "데님 재킷",
];
const BRANDS: &[&str] = &["무드블랑", "데일리유", "어반스텝"];
const SUPPLIERS: &[&str] = &["한빛상사", "서울물류"];
const GROUPS: &[(&str, &str)] = &[("G001", "상의"), ("G002", "하의"), ("G003", "아우터")];
const COLORS: &[&str] = &["블랙", "아이보리", "네이비"];
const SIZES: &[&str] = &["S", "M", "L"];

/// Generates `count` raw product records in the shapes the admin screens
/// actually receive: mixed legacy field names, sometimes-missing suppliers
/// and shipping policies, and the occasional identity-less variant row.
pub fn generate_products(count: usize) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(count as u64);
    let now = Utc::now();

    (0..count)
        .map(|i| {
            let (group_id, group_name) = GROUPS[i % GROUPS.len()];
            let selling = f64::from(rng.gen_range(50..800) * 100);
            let supply = (selling * rng.gen_range(0.55..0.85)).round();
            let created_at = (now - Duration::days(i as i64)).to_rfc3339();

            let mut product = json!({
                "id": Uuid::new_v4().to_string(),
                "code": format!("P{:04}", i + 1),
                "name": format!("{} {}", NAMES[i % NAMES.len()], i + 1),
                "brand": BRANDS[i % BRANDS.len()],
                "selling_price": selling,
                "supply_price": supply,
                "created_at": created_at,
                "group_id": group_id,
                "group_name": group_name,
                "extra_fields": {
                    "origin_country": "KR",
                    "material": "면 100%",
                },
                "variants": generate_variants(i, &mut rng),
            });

            // Every fourth record has no supplier: those resolve to in-house
            if i % 4 != 0 {
                product["supplier_name"] = json!(SUPPLIERS[i % SUPPLIERS.len()]);
            }
            match i % 3 {
                0 => product["shipping_policy"] = json!("기본 배송"),
                1 => product["shipping_policy"] = json!(SHIPPING_POLICY_UNSPECIFIED),
                _ => {}
            }

            product
        })
        .collect()
}

fn generate_variants(product_index: usize, rng: &mut StdRng) -> Vec<Value> {
    let variant_count = 1 + product_index % 3;

    (0..variant_count)
        .map(|v| {
            let mut variant = json!({
                "color": COLORS[v % COLORS.len()],
                "size": SIZES[v % SIZES.len()],
                "stock": rng.gen_range(0..120),
                "option_memos": ["", "초도 물량", ""],
            });

            // Every fifth product's rows carry no identity fields at all,
            // exercising the positional id fallback
            if product_index % 5 != 0 {
                variant["option_code"] = json!(format!("P{:04}-{}", product_index + 1, v + 1));
            }

            variant
        })
        .collect()
}
