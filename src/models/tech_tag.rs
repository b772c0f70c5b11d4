//! Static catalog of technical tags.
//!
//! Tags are read-only reference data: an id, Japanese and English names,
//! Tailwind color tokens for badges, and a category that drives ordering.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Language;

/// Grouping of tech tags. Declaration order is display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TechCategory {
    MissileDefense,
    AirDefense,
    Nuclear,
    C4isr,
    AiTech,
    Cyber,
    Space,
    Naval,
    Ground,
    Intelligence,
    Simulation,
    Logistics,
    International,
    Policy,
    Other,
}

impl TechCategory {
    /// Sort rank, 1 is shown first.
    pub fn priority(&self) -> u8 {
        match self {
            TechCategory::MissileDefense => 1,
            TechCategory::AirDefense => 2,
            TechCategory::Nuclear => 3,
            TechCategory::C4isr => 4,
            TechCategory::AiTech => 5,
            TechCategory::Cyber => 6,
            TechCategory::Space => 7,
            TechCategory::Naval => 8,
            TechCategory::Ground => 9,
            TechCategory::Intelligence => 10,
            TechCategory::Simulation => 11,
            TechCategory::Logistics => 12,
            TechCategory::International => 13,
            TechCategory::Policy => 14,
            TechCategory::Other => 15,
        }
    }
}

/// One entry of the tech tag catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechTag {
    pub id: &'static str,
    pub name_ja: &'static str,
    pub name_en: &'static str,
    pub color: &'static str,
    pub bg_color: &'static str,
    pub border_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub category: TechCategory,
}

impl TechTag {
    pub fn name(&self, language: Language) -> &'static str {
        match language {
            Language::Ja => self.name_ja,
            Language::En => self.name_en,
        }
    }
}

pub static TECH_TAGS: &[TechTag] = &[
    TechTag {
        id: "missile_defense",
        name_ja: "ミサイル防衛",
        name_en: "Missile Defense",
        color: "text-red-800",
        bg_color: "bg-red-50",
        border_color: "border-red-200",
        description: None,
        category: TechCategory::MissileDefense,
    },
    TechTag {
        id: "iamd",
        name_ja: "IAMD",
        name_en: "IAMD",
        color: "text-red-700",
        bg_color: "bg-red-100",
        border_color: "border-red-300",
        description: Some("Integrated Air and Missile Defense"),
        category: TechCategory::MissileDefense,
    },
    TechTag {
        id: "golden_dome",
        name_ja: "ゴールデン・ドーム",
        name_en: "Golden Dome",
        color: "text-yellow-800",
        bg_color: "bg-yellow-50",
        border_color: "border-yellow-200",
        description: None,
        category: TechCategory::MissileDefense,
    },
    TechTag {
        id: "c4isr",
        name_ja: "C4ISR",
        name_en: "C4ISR",
        color: "text-blue-800",
        bg_color: "bg-blue-50",
        border_color: "border-blue-200",
        description: Some("Command, Control, Communications, Computers, Intelligence, Surveillance and Reconnaissance"),
        category: TechCategory::C4isr,
    },
    TechTag {
        id: "ict",
        name_ja: "ICT",
        name_en: "ICT",
        color: "text-blue-700",
        bg_color: "bg-blue-100",
        border_color: "border-blue-300",
        description: Some("Information and Communication Technology"),
        category: TechCategory::C4isr,
    },
    TechTag {
        id: "next_gen_comm",
        name_ja: "次世代通信",
        name_en: "Next-Gen Communications",
        color: "text-indigo-800",
        bg_color: "bg-indigo-50",
        border_color: "border-indigo-200",
        description: None,
        category: TechCategory::C4isr,
    },
    TechTag {
        id: "ai",
        name_ja: "AI",
        name_en: "Artificial Intelligence",
        color: "text-purple-800",
        bg_color: "bg-purple-50",
        border_color: "border-purple-200",
        description: None,
        category: TechCategory::AiTech,
    },
    TechTag {
        id: "advanced_tech",
        name_ja: "先端技術",
        name_en: "Advanced Technology",
        color: "text-purple-700",
        bg_color: "bg-purple-100",
        border_color: "border-purple-300",
        description: None,
        category: TechCategory::AiTech,
    },
    TechTag {
        id: "machine_learning",
        name_ja: "機械学習",
        name_en: "Machine Learning",
        color: "text-violet-800",
        bg_color: "bg-violet-50",
        border_color: "border-violet-200",
        description: None,
        category: TechCategory::AiTech,
    },
    TechTag {
        id: "cyber_security",
        name_ja: "サイバーセキュリティ",
        name_en: "Cybersecurity",
        color: "text-green-800",
        bg_color: "bg-green-50",
        border_color: "border-green-200",
        description: None,
        category: TechCategory::Cyber,
    },
    TechTag {
        id: "cyber_warfare",
        name_ja: "サイバー戦",
        name_en: "Cyber Warfare",
        color: "text-emerald-800",
        bg_color: "bg-emerald-50",
        border_color: "border-emerald-200",
        description: None,
        category: TechCategory::Cyber,
    },
    TechTag {
        id: "space_defense",
        name_ja: "宇宙防衛",
        name_en: "Space Defense",
        color: "text-indigo-800",
        bg_color: "bg-indigo-50",
        border_color: "border-indigo-200",
        description: None,
        category: TechCategory::Space,
    },
    TechTag {
        id: "satellite",
        name_ja: "衛星技術",
        name_en: "Satellite Technology",
        color: "text-sky-800",
        bg_color: "bg-sky-50",
        border_color: "border-sky-200",
        description: None,
        category: TechCategory::Space,
    },
    TechTag {
        id: "intelligence",
        name_ja: "インテリジェンス",
        name_en: "Intelligence",
        color: "text-slate-800",
        bg_color: "bg-slate-50",
        border_color: "border-slate-200",
        description: None,
        category: TechCategory::Intelligence,
    },
    TechTag {
        id: "sigint",
        name_ja: "SIGINT",
        name_en: "SIGINT",
        color: "text-gray-800",
        bg_color: "bg-gray-50",
        border_color: "border-gray-200",
        description: Some("Signals Intelligence"),
        category: TechCategory::Intelligence,
    },
    TechTag {
        id: "international_affairs",
        name_ja: "国際情勢",
        name_en: "International Affairs",
        color: "text-orange-800",
        bg_color: "bg-orange-50",
        border_color: "border-orange-200",
        description: None,
        category: TechCategory::International,
    },
    TechTag {
        id: "geopolitics",
        name_ja: "地政学",
        name_en: "Geopolitics",
        color: "text-amber-800",
        bg_color: "bg-amber-50",
        border_color: "border-amber-200",
        description: None,
        category: TechCategory::International,
    },
    TechTag {
        id: "defense_policy",
        name_ja: "防衛政策",
        name_en: "Defense Policy",
        color: "text-rose-800",
        bg_color: "bg-rose-50",
        border_color: "border-rose-200",
        description: None,
        category: TechCategory::Policy,
    },
    TechTag {
        id: "strategy",
        name_ja: "戦略",
        name_en: "Strategy",
        color: "text-pink-800",
        bg_color: "bg-pink-50",
        border_color: "border-pink-200",
        description: None,
        category: TechCategory::Policy,
    },
    TechTag {
        id: "air_defense",
        name_ja: "航空防衛",
        name_en: "Air Defense",
        color: "text-sky-800",
        bg_color: "bg-sky-50",
        border_color: "border-sky-200",
        description: None,
        category: TechCategory::AirDefense,
    },
    TechTag {
        id: "fighter_aircraft",
        name_ja: "戦闘機",
        name_en: "Fighter Aircraft",
        color: "text-sky-700",
        bg_color: "bg-sky-100",
        border_color: "border-sky-300",
        description: None,
        category: TechCategory::AirDefense,
    },
    TechTag {
        id: "radar",
        name_ja: "レーダー",
        name_en: "Radar",
        color: "text-cyan-800",
        bg_color: "bg-cyan-50",
        border_color: "border-cyan-200",
        description: None,
        category: TechCategory::AirDefense,
    },
    TechTag {
        id: "naval_systems",
        name_ja: "海上システム",
        name_en: "Naval Systems",
        color: "text-teal-800",
        bg_color: "bg-teal-50",
        border_color: "border-teal-200",
        description: None,
        category: TechCategory::Naval,
    },
    TechTag {
        id: "submarine",
        name_ja: "潜水艦",
        name_en: "Submarine",
        color: "text-teal-700",
        bg_color: "bg-teal-100",
        border_color: "border-teal-300",
        description: None,
        category: TechCategory::Naval,
    },
    TechTag {
        id: "anti_ship",
        name_ja: "対艦ミサイル",
        name_en: "Anti-Ship Missile",
        color: "text-emerald-700",
        bg_color: "bg-emerald-50",
        border_color: "border-emerald-200",
        description: None,
        category: TechCategory::Naval,
    },
    TechTag {
        id: "ground_systems",
        name_ja: "陸上システム",
        name_en: "Ground Systems",
        color: "text-lime-800",
        bg_color: "bg-lime-50",
        border_color: "border-lime-200",
        description: None,
        category: TechCategory::Ground,
    },
    TechTag {
        id: "artillery",
        name_ja: "砲兵",
        name_en: "Artillery",
        color: "text-lime-700",
        bg_color: "bg-lime-100",
        border_color: "border-lime-300",
        description: None,
        category: TechCategory::Ground,
    },
    TechTag {
        id: "armored_vehicle",
        name_ja: "装甲車両",
        name_en: "Armored Vehicle",
        color: "text-green-700",
        bg_color: "bg-green-100",
        border_color: "border-green-300",
        description: None,
        category: TechCategory::Ground,
    },
    TechTag {
        id: "nuclear_tech",
        name_ja: "核技術",
        name_en: "Nuclear Technology",
        color: "text-red-900",
        bg_color: "bg-red-50",
        border_color: "border-red-300",
        description: None,
        category: TechCategory::Nuclear,
    },
    TechTag {
        id: "nuclear_weapon",
        name_ja: "核兵器",
        name_en: "Nuclear Weapon",
        color: "text-red-800",
        bg_color: "bg-red-100",
        border_color: "border-red-400",
        description: None,
        category: TechCategory::Nuclear,
    },
    TechTag {
        id: "nonproliferation",
        name_ja: "核不拡散",
        name_en: "Nuclear Nonproliferation",
        color: "text-orange-800",
        bg_color: "bg-orange-50",
        border_color: "border-orange-200",
        description: None,
        category: TechCategory::Nuclear,
    },
    TechTag {
        id: "logistics",
        name_ja: "ロジスティクス",
        name_en: "Logistics",
        color: "text-amber-800",
        bg_color: "bg-amber-50",
        border_color: "border-amber-200",
        description: None,
        category: TechCategory::Logistics,
    },
    TechTag {
        id: "supply_chain",
        name_ja: "サプライチェーン",
        name_en: "Supply Chain",
        color: "text-yellow-800",
        bg_color: "bg-yellow-50",
        border_color: "border-yellow-200",
        description: None,
        category: TechCategory::Logistics,
    },
    TechTag {
        id: "simulation",
        name_ja: "シミュレーション",
        name_en: "Simulation",
        color: "text-neutral-800",
        bg_color: "bg-neutral-50",
        border_color: "border-neutral-200",
        description: None,
        category: TechCategory::Simulation,
    },
    TechTag {
        id: "digital_twin",
        name_ja: "デジタルツイン",
        name_en: "Digital Twin",
        color: "text-stone-800",
        bg_color: "bg-stone-50",
        border_color: "border-stone-200",
        description: None,
        category: TechCategory::Simulation,
    },
];

/// Look up a tag by id.
pub fn tech_tag(id: &str) -> Option<&'static TechTag> {
    TECH_TAGS.iter().find(|tag| tag.id == id)
}

/// Resolve ids to catalog entries, dropping unknown ids.
pub fn tech_tags<S: AsRef<str>>(ids: &[S]) -> Vec<&'static TechTag> {
    ids.iter().filter_map(|id| tech_tag(id.as_ref())).collect()
}

fn priority_order(a: &TechTag, b: &TechTag) -> Ordering {
    a.category
        .priority()
        .cmp(&b.category.priority())
        .then_with(|| a.name_ja.cmp(b.name_ja))
}

/// Sort by category priority, then Japanese name.
pub fn sort_tech_tags(tags: &mut [&'static TechTag]) {
    tags.sort_by(|a, b| priority_order(a, b));
}

/// Group resolved tags by category, categories in priority order.
pub fn group_by_category<S: AsRef<str>>(ids: &[S]) -> BTreeMap<TechCategory, Vec<&'static TechTag>> {
    let mut groups: BTreeMap<TechCategory, Vec<&'static TechTag>> = BTreeMap::new();
    for tag in tech_tags(ids) {
        groups.entry(tag.category).or_default().push(tag);
    }
    groups
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = TECH_TAGS.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), TECH_TAGS.len());
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let tags = tech_tags(&["iamd", "nope", "radar"]);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_sort_by_priority_then_name() {
        let mut tags = tech_tags(&["strategy", "radar", "golden_dome", "iamd"]);
        sort_tech_tags(&mut tags);
        let ids: Vec<_> = tags.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["iamd", "golden_dome", "radar", "strategy"]);
    }

    #[test]
    fn test_group_by_category() {
        let groups = group_by_category(&["ai", "sigint", "machine_learning"]);
        assert_eq!(groups[&TechCategory::AiTech].len(), 2);
        assert_eq!(groups[&TechCategory::Intelligence].len(), 1);
        assert_eq!(groups.keys().next(), Some(&TechCategory::AiTech));
    }

    #[test]
    fn test_priority_matches_declaration_order() {
        assert!(TechCategory::MissileDefense < TechCategory::Policy);
        assert_eq!(TechCategory::Other.priority(), 15);
        assert_eq!(tech_tag("sigint").unwrap().name(Language::En), "SIGINT");
    }
}
