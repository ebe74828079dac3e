//! Built-in catalogue of paper labels (one per province or exam category).

/// A paper list label on the exam site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub code: &'static str,
    pub region: &'static str,
    /// Included in the default crawl set.
    pub crawl: bool,
}

const fn label(code: &'static str, region: &'static str, crawl: bool) -> Label {
    Label {
        code,
        region,
        crawl,
    }
}

pub const LABELS: &[Label] = &[
    label("101", "国考", false),
    label("102", "安徽", false),
    label("103", "北京", false),
    label("104", "福建", false),
    label("105", "甘肃", true),
    label("106", "广东", true),
    label("107", "广西", true),
    label("108", "贵州", true),
    label("109", "海南", true),
    label("110", "河北", true),
    label("111", "河南", true),
    label("112", "黑龙江", true),
    label("113", "湖北", true),
    label("114", "湖南", true),
    label("115", "吉林", true),
    label("116", "江苏", true),
    label("117", "江西", true),
    label("118", "辽宁", true),
    label("119", "内蒙古", true),
    label("120", "宁夏", true),
    label("121", "青海", true),
    label("122", "山东", true),
    label("123", "山西", true),
    label("124", "陕西", true),
    label("125", "上海", true),
    label("126", "四川", true),
    label("127", "天津", true),
    label("128", "西藏", false),
    label("129", "新疆", true),
    label("5244", "新疆兵团", true),
    label("130", "云南", true),
    label("131", "浙江", true),
    label("132", "重庆", true),
    label("133", "广州", false),
    label("134", "深圳", true),
    label("3591", "选调生", true),
    label("2894", "公安", true),
];

/// Labels crawled when none are given explicitly.
pub fn default_crawl_labels() -> Vec<&'static str> {
    LABELS.iter().filter(|l| l.crawl).map(|l| l.code).collect()
}

/// Labels answered when none are given explicitly.
pub fn default_answer_labels() -> Vec<&'static str> {
    LABELS.iter().map(|l| l.code).collect()
}

/// Region name for a label code.
pub fn region(code: &str) -> Option<&'static str> {
    LABELS.iter().find(|l| l.code == code).map(|l| l.region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sets() {
        let crawl = default_crawl_labels();
        assert!(!crawl.contains(&"101"));
        assert!(!crawl.contains(&"128"));
        assert!(crawl.contains(&"5244"));
        assert_eq!(crawl.len(), LABELS.len() - 6);
        assert_eq!(default_answer_labels().len(), LABELS.len());
    }

    #[test]
    fn test_region_lookup() {
        assert_eq!(region("3591"), Some("选调生"));
        assert_eq!(region("999"), None);
    }
}
