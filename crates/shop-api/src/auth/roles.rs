//! 레벨 기반 접근 제어.
//!
//! 사용자 레벨은 정수이며 작을수록 더 넓은 권한을 가집니다.
//! 리소스 클래스마다 접근 가능한 최대 레벨이 정해져 있습니다.

use serde::{Deserialize, Serialize};

/// 보호 대상 리소스 클래스.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceClass {
    /// 사용자 관리 - 레벨 0만 접근 가능
    User,
    /// 상품 변경 - 레벨 1 이하 접근 가능
    Product,
}

impl ResourceClass {
    /// 접근 가능한 최대 레벨 (이 값 이하만 허용).
    pub fn max_level(&self) -> i32 {
        match self {
            ResourceClass::User => 0,
            ResourceClass::Product => 1,
        }
    }

    /// 주어진 레벨이 이 리소스에 접근 가능한지 확인.
    pub fn permits(&self, level: i32) -> bool {
        level <= self.max_level()
    }

    /// 로그/메트릭 라벨용 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceClass::User => "users",
            ResourceClass::Product => "products",
        }
    }
}

impl std::fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
