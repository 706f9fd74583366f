//! Built-in text dictionaries.
//!
//! Two languages are supported. Unknown language codes fall back to
//! Chinese, which is the default locale of the wallpapers.

use serde::{Deserialize, Serialize};

/// Wallpaper text language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Simplified Chinese (default)
    #[default]
    Zh,
    /// English
    En,
}

impl Language {
    /// Resolve a language code; anything other than `en` is `zh`.
    pub fn resolve(code: Option<&str>) -> Self {
        match code {
            Some("en") => Language::En,
            _ => Language::Zh,
        }
    }

    /// Query-string code.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Text table for this language.
    pub fn dictionary(self) -> &'static Dictionary {
        match self {
            Language::Zh => &ZH,
            Language::En => &EN,
        }
    }
}

/// Localized strings used by the style routines.
#[derive(Debug)]
pub struct Dictionary {
    pub days_left: &'static str,
    pub default_goal: &'static str,
    pub invalid_target: &'static str,
    pub this_week: &'static str,
    pub year: &'static str,
    pub month: &'static str,
    pub week: &'static str,
    pub day_of_year: &'static str,
    pub days_remaining: &'static str,
    pub illumination: &'static str,
    /// January first
    pub months: [&'static str; 12],
    /// Monday first
    pub weekdays: [&'static str; 7],
    /// Winter, spring, summer, autumn
    pub seasons: [&'static str; 4],
    /// New moon first, in eighths of the cycle
    pub moon_phases: [&'static str; 8],
    pub quotes: &'static [&'static str],
}

static ZH: Dictionary = Dictionary {
    days_left: "剩余天数",
    default_goal: "我的目标",
    invalid_target: "无效的目标日期",
    this_week: "本周",
    year: "年度",
    month: "本月",
    week: "本周",
    day_of_year: "今年第几天",
    days_remaining: "今年剩余",
    illumination: "亮度",
    months: [
        "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月",
        "十二月",
    ],
    weekdays: ["周一", "周二", "周三", "周四", "周五", "周六", "周日"],
    seasons: ["冬", "春", "夏", "秋"],
    moon_phases: [
        "新月", "蛾眉月", "上弦月", "盈凸月", "满月", "亏凸月", "下弦月", "残月",
    ],
    quotes: &[
        "少壮不努力，老大徒伤悲",
        "一寸光阴一寸金",
        "明日复明日，明日何其多",
        "盛年不重来，一日难再晨",
        "千里之行，始于足下",
        "不积跬步，无以至千里",
        "业精于勤，荒于嬉",
        "日日行，不怕千万里",
    ],
};

static EN: Dictionary = Dictionary {
    days_left: "Days left",
    default_goal: "My Goal",
    invalid_target: "Invalid target date",
    this_week: "This week",
    year: "Year",
    month: "Month",
    week: "Week",
    day_of_year: "Day of year",
    days_remaining: "Days left",
    illumination: "Illumination",
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ],
    weekdays: [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ],
    seasons: ["Winter", "Spring", "Summer", "Autumn"],
    moon_phases: [
        "New Moon",
        "Waxing Crescent",
        "First Quarter",
        "Waxing Gibbous",
        "Full Moon",
        "Waning Gibbous",
        "Last Quarter",
        "Waning Crescent",
    ],
    quotes: &[
        "The days are long but the years are short.",
        "Lost time is never found again.",
        "Well begun is half done.",
        "A journey of a thousand miles begins with a single step.",
        "Time you enjoy wasting is not wasted time.",
        "Do it now. Sometimes later becomes never.",
        "Small steps every day add up.",
        "The best time to start was yesterday. The next best is today.",
    ],
};
