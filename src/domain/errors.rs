use thiserror::Error;

/// Every failure the purchase flow can surface.
///
/// Lock-protocol, business-rule and infrastructure failures are distinct kinds so that
/// callers (and dashboards) can tell "try again later" apart from "sold out".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeckillError {
    #[error("Lock busy: {0}")]
    LockBusy(String),
    #[error("Lost lock ownership: {0}")]
    LostOwnership(String),
    #[error("Stock exhausted")]
    StockExhausted,
    #[error("Duplicate order")]
    DuplicateOrder,
    #[error("Outside of the sale window")]
    OutOfSaleWindow,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Remote service error: {0}")]
    RemoteService(String),
    #[error("Unauthorized")]
    Unauthorized,
}

pub type SeckillResult<T> = Result<T, SeckillError>;

impl SeckillError {
    /// Stable code reported to clients.
    pub fn code(&self) -> i32 {
        match self {
            SeckillError::LockBusy(_) => 50001,
            SeckillError::LostOwnership(_) => 50002,
            SeckillError::StockExhausted => 50101,
            SeckillError::DuplicateOrder => 50102,
            SeckillError::OutOfSaleWindow => 50103,
            SeckillError::NotFound(_) => 50104,
            SeckillError::StoreUnavailable(_) => 50201,
            SeckillError::RemoteService(_) => 50202,
            SeckillError::Unauthorized => 401,
        }
    }

    /// Client-facing message. Infrastructure details never leak through here.
    pub fn message(&self) -> &'static str {
        match self {
            SeckillError::LockBusy(_) | SeckillError::LostOwnership(_) => {
                "System busy, please try again later"
            }
            SeckillError::StockExhausted => "Sold out, you came too late",
            SeckillError::DuplicateOrder => "You have already purchased this item",
            SeckillError::OutOfSaleWindow => "Not within the sale window",
            SeckillError::NotFound(_) => "Illegal operation",
            SeckillError::StoreUnavailable(_) | SeckillError::RemoteService(_) => {
                "Service unavailable, please try again later"
            }
            SeckillError::Unauthorized => "Please log in",
        }
    }

    pub fn is_lock_error(&self) -> bool {
        matches!(
            self,
            SeckillError::LockBusy(_) | SeckillError::LostOwnership(_)
        )
    }

    pub fn is_business_error(&self) -> bool {
        matches!(
            self,
            SeckillError::StockExhausted
                | SeckillError::DuplicateOrder
                | SeckillError::OutOfSaleWindow
                | SeckillError::NotFound(_)
        )
    }

    /// Short label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            SeckillError::LockBusy(_) => "lock_busy",
            SeckillError::LostOwnership(_) => "lost_ownership",
            SeckillError::StockExhausted => "stock_exhausted",
            SeckillError::DuplicateOrder => "duplicate_order",
            SeckillError::OutOfSaleWindow => "out_of_sale_window",
            SeckillError::NotFound(_) => "not_found",
            SeckillError::StoreUnavailable(_) => "store_unavailable",
            SeckillError::RemoteService(_) => "remote_service",
            SeckillError::Unauthorized => "unauthorized",
        }
    }
}

impl From<sqlx::Error> for SeckillError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                // Unique violation on the (user, seckill, time) purchase index
                let unique = message.contains("UNIQUE") || message.contains("unique");
                if unique && message.contains("order_info") {
                    SeckillError::DuplicateOrder
                } else {
                    SeckillError::StoreUnavailable(format!("Database error: {}", message))
                }
            }
            other => SeckillError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for SeckillError {
    fn from(err: reqwest::Error) -> Self {
        SeckillError::RemoteService(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_disjoint() {
        let lock = SeckillError::LockBusy("k".to_string());
        assert!(lock.is_lock_error());
        assert!(!lock.is_business_error());

        let business = SeckillError::StockExhausted;
        assert!(business.is_business_error());
        assert!(!business.is_lock_error());

        let infra = SeckillError::StoreUnavailable("connection refused".to_string());
        assert!(!infra.is_lock_error());
        assert!(!infra.is_business_error());
    }

    #[test]
    fn test_infrastructure_message_is_generic() {
        let err = SeckillError::StoreUnavailable("password=hunter2".to_string());
        assert!(!err.message().contains("hunter2"));
        assert_eq!(err.code(), 50201);
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(SeckillError::LockBusy(String::new()).code(), 50001);
        assert_eq!(SeckillError::DuplicateOrder.code(), 50102);
        assert_eq!(SeckillError::StockExhausted.code(), 50101);
    }
}
