//! Tech tag inference from file name, title and basic tags.

use crate::models::tech_tag::{sort_tech_tags, tech_tags};

/// Number of tags shown as primary on cards.
pub const PRIMARY_TAG_COUNT: usize = 3;

/// Topic rules: every trigger group must have at least one hit.
const TOPIC_RULES: &[(&[&[&str]], &[&str])] = &[
    (
        &[&["golden", "ゴールデン", "dome"]],
        &["golden_dome", "missile_defense", "iamd"],
    ),
    (&[&["mod"], &["ai"]], &["ai", "advanced_tech", "ict"]),
    (&[&["defense"], &["info"]], &["c4isr", "ict", "next_gen_comm"]),
    (
        &[&["iran", "israel", "イラン", "イスラエル"]],
        &["international_affairs", "geopolitics", "intelligence"],
    ),
];

/// Single keyword hits, checked in this order.
const KEYWORD_MAP: &[(&str, &[&str])] = &[
    ("ミサイル", &["missile_defense"]),
    ("missile", &["missile_defense"]),
    ("iamd", &["iamd", "missile_defense"]),
    ("c4isr", &["c4isr"]),
    ("ict", &["ict"]),
    ("情報通信", &["ict", "c4isr"]),
    ("ai", &["ai"]),
    ("人工知能", &["ai"]),
    ("機械学習", &["machine_learning"]),
    ("サイバー", &["cyber_security"]),
    ("cyber", &["cyber_security"]),
    ("宇宙", &["space_defense"]),
    ("space", &["space_defense"]),
    ("衛星", &["satellite"]),
    ("satellite", &["satellite"]),
    ("インテリジェンス", &["intelligence"]),
    ("intelligence", &["intelligence"]),
    ("国際", &["international_affairs"]),
    ("international", &["international_affairs"]),
    ("地政学", &["geopolitics"]),
    ("geopolitics", &["geopolitics"]),
    ("防衛政策", &["defense_policy"]),
    ("policy", &["defense_policy"]),
    ("戦略", &["strategy"]),
    ("strategy", &["strategy"]),
];

/// Infer tech tag ids, deduplicated in first-hit order.
///
/// Matching is plain substring search, so short keywords like `ai` or
/// `ict` also fire inside longer words.
pub fn infer_tech_tags<S: AsRef<str>>(file_name: &str, title: &str, tags: &[S]) -> Vec<String> {
    let joined_tags: Vec<&str> = tags.iter().map(AsRef::as_ref).collect();
    let text = format!("{} {} {}", file_name, title, joined_tags.join(" ")).to_lowercase();

    let mut ids: Vec<String> = Vec::new();
    let mut push = |new: &[&str]| {
        for id in new {
            if !ids.iter().any(|existing| existing == id) {
                ids.push((*id).to_string());
            }
        }
    };

    for (groups, tag_ids) in TOPIC_RULES {
        let all_groups_hit = groups
            .iter()
            .all(|group| group.iter().any(|kw| text.contains(kw)));
        if all_groups_hit {
            push(*tag_ids);
        }
    }

    for (keyword, tag_ids) in KEYWORD_MAP {
        if text.contains(keyword) {
            push(*tag_ids);
        }
    }

    ids
}

/// The first few tag ids after priority sort.
pub fn primary_tech_tags<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut tags = tech_tags(ids);
    sort_tech_tags(&mut tags);
    tags.into_iter()
        .take(PRIMARY_TAG_COUNT)
        .map(|tag| tag.id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_TAGS: &[&str] = &[];

    #[test]
    fn test_golden_dome_article() {
        let ids = infer_tech_tags(
            "2025-08-24-golden-dome-analysis",
            "Golden Dome Missile Shield",
            NO_TAGS,
        );
        assert!(ids.contains(&"golden_dome".to_string()));
        assert!(ids.contains(&"missile_defense".to_string()));
        assert!(ids.contains(&"iamd".to_string()));
        assert_eq!(&ids[..3], &["golden_dome", "missile_defense", "iamd"]);
    }

    #[test]
    fn test_topic_rule_needs_every_group() {
        let ids = infer_tech_tags("mod-report", "", NO_TAGS);
        assert!(!ids.contains(&"advanced_tech".to_string()));

        let ids = infer_tech_tags("mod-ai-dashboard", "", NO_TAGS);
        assert_eq!(&ids[..3], &["ai", "advanced_tech", "ict"]);
    }

    #[test]
    fn test_ids_are_deduplicated() {
        let ids = infer_tech_tags("iamd-missile", "ミサイル", NO_TAGS);
        let missile = ids.iter().filter(|id| *id == "missile_defense").count();
        assert_eq!(missile, 1);
    }

    #[test]
    fn test_basic_tags_take_part_in_matching() {
        let ids = infer_tech_tags("2025-01-01-report", "報告", &["宇宙"]);
        assert_eq!(ids, vec!["space_defense".to_string()]);
    }

    #[test]
    fn test_primary_tags_sorted_and_capped() {
        let ids = vec!["strategy", "radar", "golden_dome", "iamd", "missile_defense"];
        assert_eq!(
            primary_tech_tags(&ids),
            vec!["iamd", "golden_dome", "missile_defense"]
        );
    }
}
