use std::time::Duration;

use findmark_config::SearchConfig;
use findmark_engine::search::{Exclusions, MarkerStyle, SearchSettings};
use findmark_engine::tree::{ScrollBehavior, ScrollBlock, ScrollOptions};

/// Engine settings for the `[search]` table of the config file.
pub fn search_settings(config: &SearchConfig) -> SearchSettings {
    SearchSettings {
        marker: MarkerStyle {
            tag: config.highlight_tag.clone(),
            class: config.highlight_class.clone(),
            extra_classes: config.extra_classes.clone(),
        },
        exclusions: Exclusions {
            tags: config.excluded_tags.clone(),
            classes: config.excluded_classes.clone(),
        },
        scroll: ScrollOptions {
            behavior: if config.smooth_scroll {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Instant
            },
            block: ScrollBlock::Center,
        },
        scroll_delay: Duration::from_millis(config.scroll_delay_ms),
    }
}
