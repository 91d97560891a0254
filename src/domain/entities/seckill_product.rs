use serde::{Deserialize, Serialize};

/// One sale row: a product offered at `time` o'clock with a limited stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeckillProduct {
    pub id: i64,
    pub product_id: i64,
    pub seckill_price: f64,
    pub integral: i64,
    pub stock_count: i64,
    pub start_date: String, // YYYY-MM-DD
    pub time: i32,
}

/// Product metadata owned by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    pub product_title: Option<String>,
    pub product_img: Option<String>,
    pub product_detail: Option<String>,
    pub product_price: f64,
}

/// Sale row merged with its product metadata. `id` is always the sale id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeckillProductVo {
    pub id: i64,
    pub product_id: i64,
    pub seckill_price: f64,
    pub integral: i64,
    pub stock_count: i64,
    pub start_date: String,
    pub time: i32,
    pub product_name: Option<String>,
    pub product_title: Option<String>,
    pub product_img: Option<String>,
    pub product_detail: Option<String>,
    pub product_price: Option<f64>,
}

impl SeckillProductVo {
    pub fn merge(sale: &SeckillProduct, product: Option<&Product>) -> Self {
        Self {
            id: sale.id,
            product_id: sale.product_id,
            seckill_price: sale.seckill_price,
            integral: sale.integral,
            stock_count: sale.stock_count,
            start_date: sale.start_date.clone(),
            time: sale.time,
            product_name: product.map(|p| p.product_name.clone()),
            product_title: product.and_then(|p| p.product_title.clone()),
            product_img: product.and_then(|p| p.product_img.clone()),
            product_detail: product.and_then(|p| p.product_detail.clone()),
            product_price: product.map(|p| p.product_price),
        }
    }
}

/// Lock key guarding the stock counter of one sale session.
pub fn stock_lock_key(seckill_id: i64, time: i32) -> String {
    format!("seckill:product:stockCount:{}:{}", time, seckill_id)
}
