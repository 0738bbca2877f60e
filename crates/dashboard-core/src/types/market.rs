//! 시장 구분 정의.
//!
//! 대시보드가 다루는 세 가지 분석 대상:
//! - `Market::Kr` - 한국 주식 (KRX 상장 종목, 6자리 코드)
//! - `Market::Us` - 미국 주식 (티커 심볼)
//! - `Market::Crypto` - 암호화폐 (원화 마켓 심볼, 예: BTC)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 분석 대상 시장.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    /// 한국 주식
    Kr,
    /// 미국 주식
    Us,
    /// 암호화폐
    Crypto,
}

impl Market {
    /// 모든 시장 목록.
    pub const ALL: [Market; 3] = [Market::Kr, Market::Us, Market::Crypto];

    /// 설정 파일 이름 등에 쓰이는 소문자 키.
    pub fn key(&self) -> &'static str {
        match self {
            Market::Kr => "kr",
            Market::Us => "us",
            Market::Crypto => "crypto",
        }
    }

    /// 화면 표시용 이름.
    pub fn display_name(&self) -> &'static str {
        match self {
            Market::Kr => "한국주식",
            Market::Us => "미국주식",
            Market::Crypto => "암호화폐",
        }
    }

    /// PER/배당률 같은 밸류에이션 지표가 의미 있는 시장인지 여부.
    pub fn has_valuation(&self) -> bool {
        !matches!(self, Market::Crypto)
    }

    /// 가격을 정수로 표시하는 시장인지 여부 (원화 주식).
    pub fn integer_prices(&self) -> bool {
        matches!(self, Market::Kr)
    }

    /// 종목 입력이 비어 있을 때 사용할 기본 종목 목록.
    pub fn default_tickers(&self) -> &'static str {
        match self {
            Market::Kr => "005930, 000660, 005380, 000270, 012330, 035420, 035720, 017670, 207940, 008770, 041510, 122870, 035900, 352820",
            Market::Us => "AAPL, MSFT, NVDA, GOOGL, AMZN, META, TSLA",
            Market::Crypto => "BTC, ETH, SOL, XRP, DOGE, ADA",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kr" | "krx" | "korea" | "한국" | "한국주식" => Ok(Market::Kr),
            "us" | "usa" | "미국" | "미국주식" => Ok(Market::Us),
            "crypto" | "coin" | "암호화폐" | "코인" => Ok(Market::Crypto),
            _ => Err(format!(
                "Invalid market: {}. Supported: kr, us, crypto",
                s
            )),
        }
    }
}

/// 쉼표로 구분된 종목 입력을 파싱합니다.
///
/// 공백을 제거하고 대문자로 변환하며, 빈 항목은 버립니다. 입력 순서는 유지됩니다.
pub fn parse_tickers(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_from_str() {
        assert_eq!("kr".parse::<Market>().unwrap(), Market::Kr);
        assert_eq!("US".parse::<Market>().unwrap(), Market::Us);
        assert_eq!("암호화폐".parse::<Market>().unwrap(), Market::Crypto);
        assert!("forex".parse::<Market>().is_err());
    }

    #[test]
    fn test_market_key_roundtrip() {
        for market in Market::ALL {
            assert_eq!(market.key().parse::<Market>().unwrap(), market);
        }
    }

    #[test]
    fn test_has_valuation() {
        assert!(Market::Kr.has_valuation());
        assert!(Market::Us.has_valuation());
        assert!(!Market::Crypto.has_valuation());
    }

    #[test]
    fn test_parse_tickers() {
        assert_eq!(
            parse_tickers(" 005930, 000660 ,,035420 "),
            vec!["005930", "000660", "035420"]
        );
        assert_eq!(parse_tickers("btc, eth"), vec!["BTC", "ETH"]);
        assert!(parse_tickers(" , ").is_empty());
    }
}
