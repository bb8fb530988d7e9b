//! 상품 도메인 모델.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ShopError, ShopResult};

/// 트랙수트 상품 유형.
pub const PRODUCT_TYPE_TRACKSUIT: &str = "tracksuit";
/// 윈드브레이커 상품 유형.
pub const PRODUCT_TYPE_WINDBREAKER: &str = "windbreaker";

/// 유형별 목록 경로(`/api/products/tracksuits` 등)와 겹쳐 제목으로 쓸 수 없는 값.
pub const RESERVED_PRODUCT_TITLES: [&str; 2] = ["tracksuits", "windbreakers"];

/// 판매 상품.
///
/// JSON 필드는 camelCase이며 상품 유형은 `type` 키를 사용합니다.
/// `small`/`medium`/`large`는 사이즈별 재고 수량입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Product {
    #[serde(default)]
    pub id: i32,
    #[serde(rename = "type")]
    pub product_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = f64))]
    pub price: Decimal,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub small: i32,
    #[serde(default)]
    pub medium: i32,
    #[serde(default)]
    pub large: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_alt: String,
}

impl Product {
    /// URL 경로의 슬러그를 상품 제목으로 변환합니다 (`-` → 공백).
    ///
    /// ```
    /// use shop_core::Product;
    ///
    /// assert_eq!(Product::title_from_slug("classic-black-tracksuit"), "classic black tracksuit");
    /// ```
    pub fn title_from_slug(slug: &str) -> String {
        slug.replace('-', " ")
    }

    /// 상품 입력 검증.
    pub fn validate(&self) -> ShopResult<()> {
        if self.title.trim().is_empty() {
            return Err(ShopError::InvalidInput("title must not be empty".to_string()));
        }
        if RESERVED_PRODUCT_TITLES.contains(&self.title.as_str()) {
            return Err(ShopError::InvalidInput(format!(
                "title is reserved: {}",
                self.title
            )));
        }
        if self.product_type.trim().is_empty() {
            return Err(ShopError::InvalidInput("type must not be empty".to_string()));
        }
        if self.price.is_sign_negative() {
            return Err(ShopError::InvalidInput(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        if self.small < 0 || self.medium < 0 || self.large < 0 {
            return Err(ShopError::InvalidInput("stock counts must not be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Product {
        Product {
            id: 7,
            product_type: PRODUCT_TYPE_TRACKSUIT.to_string(),
            title: "classic black tracksuit".to_string(),
            description: "cotton".to_string(),
            price: dec!(59.99),
            gender: "unisex".to_string(),
            color: "black".to_string(),
            small: 3,
            medium: 5,
            large: 0,
            image_url: "/img/classic.png".to_string(),
            image_alt: "black tracksuit".to_string(),
        }
    }

    #[test]
    fn test_json_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["type"], "tracksuit");
        assert_eq!(json["imageUrl"], "/img/classic.png");
        assert_eq!(json["imageAlt"], "black tracksuit");
        assert_eq!(json["price"], serde_json::json!(59.99));
        assert!(json.get("productType").is_none());
    }

    #[test]
    fn test_create_body_without_id() {
        let body = r#"{"type":"windbreaker","title":"rain shell","price":80}"#;
        let product: Product = serde_json::from_str(body).unwrap();

        assert_eq!(product.id, 0);
        assert_eq!(product.product_type, PRODUCT_TYPE_WINDBREAKER);
        assert_eq!(product.price, dec!(80));
        assert_eq!((product.small, product.medium, product.large), (0, 0, 0));
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());

        let mut negative = sample();
        negative.price = dec!(-1);
        assert!(negative.validate().is_err());

        let mut untitled = sample();
        untitled.title = String::new();
        assert!(untitled.validate().is_err());

        for reserved in RESERVED_PRODUCT_TITLES {
            let mut shadowed = sample();
            shadowed.title = reserved.to_string();
            assert!(matches!(shadowed.validate(), Err(ShopError::InvalidInput(_))));
        }

        let mut oversold = sample();
        oversold.large = -2;
        assert!(oversold.validate().is_err());
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(Product::title_from_slug("rain-shell"), "rain shell");
        assert_eq!(Product::title_from_slug("plain"), "plain");
    }
}
