//! # History Window Service
//!
//! 履歴取得対象の日付範囲（今日を含む直近N日）

use chrono::{Days, NaiveDate};

/// 履歴ウィンドウの日数
pub const HISTORY_WINDOW_DAYS: u64 = 28;

/// 履歴ウィンドウ
///
/// 今日から過去へ向かって `days` 日分の日付を表す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    today: NaiveDate,
    days: u64,
}

impl HistoryWindow {
    /// 今日で終わる標準の28日ウィンドウ
    pub fn ending(today: NaiveDate) -> Self {
        Self {
            today,
            days: HISTORY_WINDOW_DAYS,
        }
    }

    /// 日付を新しい順（今日が先頭）に返す
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use garmin_bridge::domain::services::history_window::HistoryWindow;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    /// let dates = HistoryWindow::ending(today).dates();
    ///
    /// assert_eq!(dates.len(), 28);
    /// assert_eq!(dates[0], today);
    /// assert_eq!(dates[1], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    /// ```
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.days)
            .filter_map(|offset| self.today.checked_sub_days(Days::new(offset)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.days as usize
    }

    pub fn is_empty(&self) -> bool {
        self.days == 0
    }
}

/// 前日
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_has_28_days() {
        let window = HistoryWindow::ending(date(2024, 12, 25));
        assert_eq!(window.len(), 28);
        assert_eq!(window.dates().len(), 28);
        assert!(!window.is_empty());
    }

    #[test]
    fn test_window_today_first_oldest_last() {
        let dates = HistoryWindow::ending(date(2024, 12, 25)).dates();
        assert_eq!(dates[0], date(2024, 12, 25));
        assert_eq!(dates[27], date(2024, 11, 28));
    }

    #[test]
    fn test_window_strictly_descending() {
        let dates = HistoryWindow::ending(date(2024, 1, 10)).dates();
        for pair in dates.windows(2) {
            assert_eq!(pair[0].pred_opt().unwrap(), pair[1]);
        }
    }

    #[test]
    fn test_window_crosses_year_boundary() {
        let dates = HistoryWindow::ending(date(2024, 1, 3)).dates();
        assert_eq!(dates[3], date(2023, 12, 31));
    }

    #[test]
    fn test_yesterday() {
        assert_eq!(yesterday(date(2024, 3, 1)), date(2024, 2, 29));
    }
}
