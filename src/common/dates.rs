// src/common/dates.rs

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{common::error::AppError, models::sale::Sale};

/// Janela de tempo relativa a "agora". `thisWeek` e `thisMonth` vão até o
/// fim do dia de hoje (semana/mês até a data), não até o fim do calendário.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    #[default]
    All,
    #[serde(alias = "daily")]
    Today,
    #[serde(alias = "weekly")]
    ThisWeek,
    #[serde(alias = "monthly")]
    ThisMonth,
}

impl Period {
    /// Primeiro dia incluído na janela. `None` para `All`.
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::All => None,
            Period::Today => Some(today),
            // Semana ISO: domingo volta 6 dias, demais voltam (dia - 1)
            Period::ThisWeek => today.checked_sub_days(Days::new(
                u64::from(today.weekday().num_days_from_monday()),
            )),
            Period::ThisMonth => today.with_day(1),
        }
    }

    pub fn contains(self, date: NaiveDate, now: NaiveDateTime) -> bool {
        let today = now.date();
        match self {
            Period::All => true,
            Period::Today => is_same_day(date.and_time(NaiveTime::MIN), now),
            Period::ThisWeek | Period::ThisMonth => match self.start(today) {
                Some(start) => date >= start && date <= today,
                None => false,
            },
        }
    }
}

/// Lê a data de uma venda. Formatos aceitos:
/// - `YYYY-MM-DD` (data de calendário local, sem fuso)
/// - qualquer outra string com `-` (ISO com hora, RFC 3339)
/// - `DD/MM/YYYY`
pub fn parse_sale_date(input: &str) -> Result<NaiveDate, AppError> {
    let value = input.trim();
    let invalid = || AppError::InvalidDate(input.to_string());

    if value.is_empty() {
        return Err(invalid());
    }

    if is_plain_iso_date(value) {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid());
    }

    if value.contains('-') {
        return parse_generic(value).ok_or_else(invalid);
    }

    if value.contains('/') {
        let mut parts = value.split('/');
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        // Ano com quatro dígitos: "15/03/24" não vira o ano 24
        let year = year.trim();
        if year.len() != 4 {
            return Err(invalid());
        }
        let day: u32 = day.trim().parse().map_err(|_| invalid())?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        return NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid);
    }

    Err(invalid())
}

fn is_plain_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

fn parse_generic(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).date_naive());
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}

pub fn is_same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// Mantém só as vendas dentro do período, preservando a ordem de entrada.
/// Datas ilegíveis são descartadas com um aviso no log (exceto em `All`).
pub fn filter_by_period(sales: Vec<Sale>, period: Period, now: NaiveDateTime) -> Vec<Sale> {
    if period == Period::All {
        return sales;
    }

    sales
        .into_iter()
        .filter(|sale| match sale_date_of(sale) {
            Ok(date) => period.contains(date, now),
            Err(e) => {
                tracing::warn!("Venda {} ignorada no filtro de período: {}", sale.id, e);
                false
            }
        })
        .collect()
}

/// Ordena da venda mais recente para a mais antiga (ordenação estável).
/// Datas ilegíveis vão para o fim.
pub fn sort_by_date_desc(sales: &mut [Sale]) {
    sales.sort_by_key(|sale| std::cmp::Reverse(sale_date_of(sale).ok()));
}

pub fn sale_date_of(sale: &Sale) -> Result<NaiveDate, AppError> {
    parse_sale_date(sale.fields.sale_date.as_deref().unwrap_or_default())
}

/// Primeiro e último dia de um mês.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sale::SaleFields;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_noon(d: NaiveDate) -> NaiveDateTime {
        d.and_hms_opt(12, 0, 0).unwrap()
    }

    fn sale(id: i64, sale_date: &str) -> Sale {
        Sale {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            fields: SaleFields {
                sale_date: Some(sale_date.to_string()),
                ..Default::default()
            },
        }
    }

    fn ids(sales: &[Sale]) -> Vec<i64> {
        sales.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_both_representations_give_same_date() {
        assert_eq!(parse_sale_date("15/03/2024").unwrap(), date(2024, 3, 15));
        assert_eq!(parse_sale_date("2024-03-15").unwrap(), date(2024, 3, 15));
        assert_eq!(
            parse_sale_date("01/12/2023").unwrap(),
            parse_sale_date("2023-12-01").unwrap()
        );
    }

    #[test]
    fn test_iso_with_time_is_accepted() {
        assert_eq!(parse_sale_date("2024-03-15T10:30:00").unwrap(), date(2024, 3, 15));
        assert_eq!(parse_sale_date("2024-03-15 08:00").unwrap(), date(2024, 3, 15));
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["", "   ", "ontem", "32/01/2024", "2024-02-30", "15/03", "a/b/c", "2024-13-01"] {
            assert!(
                matches!(parse_sale_date(input), Err(AppError::InvalidDate(_))),
                "{input:?} deveria ser inválida"
            );
        }
    }

    #[test]
    fn test_two_digit_year_is_rejected() {
        assert!(matches!(parse_sale_date("15/03/24"), Err(AppError::InvalidDate(_))));
        assert!(matches!(parse_sale_date("1/3/202"), Err(AppError::InvalidDate(_))));
        assert_eq!(parse_sale_date(" 15/03/2024 ").unwrap(), date(2024, 3, 15));
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-03-13 é quarta-feira
        assert_eq!(Period::ThisWeek.start(date(2024, 3, 13)), Some(date(2024, 3, 11)));
        // domingo volta 6 dias
        assert_eq!(Period::ThisWeek.start(date(2024, 3, 17)), Some(date(2024, 3, 11)));
        // segunda é o próprio dia
        assert_eq!(Period::ThisWeek.start(date(2024, 3, 11)), Some(date(2024, 3, 11)));
        assert_eq!(Period::ThisMonth.start(date(2024, 3, 13)), Some(date(2024, 3, 1)));
        assert_eq!(Period::All.start(date(2024, 3, 13)), None);
    }

    #[test]
    fn test_filter_is_week_to_date_and_keeps_order() {
        let now = at_noon(date(2024, 3, 13));
        let sales = vec![
            sale(1, "2024-03-12"),
            sale(2, "10/03/2024"), // domingo anterior
            sale(3, "13/03/2024"),
            sale(4, "2024-03-14"), // futuro
            sale(5, "2024-03-11"),
        ];

        let week = filter_by_period(sales.clone(), Period::ThisWeek, now);
        assert_eq!(ids(&week), vec![1, 3, 5]);

        let today = filter_by_period(sales.clone(), Period::Today, now);
        assert_eq!(ids(&today), vec![3]);

        let month = filter_by_period(sales, Period::ThisMonth, now);
        assert_eq!(ids(&month), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_invalid_dates_only_survive_unfiltered_view() {
        let now = at_noon(date(2024, 3, 13));
        let sales = vec![sale(1, "sem data"), sale(2, "2024-03-13")];

        assert_eq!(ids(&filter_by_period(sales.clone(), Period::All, now)), vec![1, 2]);
        assert_eq!(ids(&filter_by_period(sales, Period::ThisMonth, now)), vec![2]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let now = at_noon(date(2024, 3, 13));
        let sales = vec![
            sale(1, "2024-03-01"),
            sale(2, "2024-02-28"),
            sale(3, "12/03/2024"),
            sale(4, "x"),
        ];

        for period in [Period::Today, Period::ThisWeek, Period::ThisMonth, Period::All] {
            let once = filter_by_period(sales.clone(), period, now);
            let twice = filter_by_period(once.clone(), period, now);
            assert_eq!(ids(&once), ids(&twice));
        }
    }

    #[test]
    fn test_sort_by_date_desc_is_stable() {
        let mut sales = vec![
            sale(1, "2024-03-01"),
            sale(2, "05/03/2024"),
            sale(3, "2024-03-01"),
            sale(4, "??"),
        ];
        sort_by_date_desc(&mut sales);
        assert_eq!(ids(&sales), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_period_aliases() {
        let p: Period = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(p, Period::ThisWeek);
        let p: Period = serde_json::from_str("\"thisMonth\"").unwrap();
        assert_eq!(p, Period::ThisMonth);
        let p: Period = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(p, Period::Today);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(2024, 2), Some((date(2024, 2, 1), date(2024, 2, 29))));
        assert_eq!(month_bounds(2023, 12), Some((date(2023, 12, 1), date(2023, 12, 31))));
        assert_eq!(month_bounds(2024, 13), None);
    }
}
