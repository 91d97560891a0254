use crate::domain::entities::{SeckillProductVo, UserInfo};
use serde::{Deserialize, Serialize};

pub const ORDER_STATUS_UNPAID: i32 = 0;

/// A placed seckill order. At most one exists per (user, seckill id, time slot).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    pub order_no: String,
    pub user_id: String,
    pub product_id: i64,
    pub seckill_id: i64,
    pub seckill_time: i32,
    pub product_name: Option<String>,
    pub product_img: Option<String>,
    pub seckill_price: f64,
    pub integral: i64,
    pub status: i32,
    pub create_date: String,
}

impl OrderInfo {
    pub fn new(user: &UserInfo, vo: &SeckillProductVo, create_date: String) -> Self {
        Self {
            order_no: uuid::Uuid::new_v4().simple().to_string(),
            user_id: user.phone.clone(),
            product_id: vo.product_id,
            seckill_id: vo.id,
            seckill_time: vo.time,
            product_name: vo.product_name.clone(),
            product_img: vo.product_img.clone(),
            seckill_price: vo.seckill_price,
            integral: vo.integral,
            status: ORDER_STATUS_UNPAID,
            create_date,
        }
    }
}
