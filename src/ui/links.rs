//! Static "watch it here" search links, grouped the way the detail pane
//! prints them. No network access; these are plain URL templates.

use urlencoding::encode;

struct Platform {
    name: &'static str,
    group: &'static str,
}

const PLATFORMS: &[Platform] = &[
    Platform { name: "Filimo", group: "🇮🇷 Iranian platforms" },
    Platform { name: "Namava", group: "🇮🇷 Iranian platforms" },
    Platform { name: "Netflix", group: "🌎 International platforms" },
    Platform { name: "Prime Video", group: "🌎 International platforms" },
    Platform { name: "Google", group: "🔍 Google and YouTube" },
    Platform { name: "YouTube", group: "🔍 Google and YouTube" },
];

fn platform_url(name: &str, title: &str, year: &str) -> String {
    match name {
        "Filimo" => format!("https://www.filimo.com/search/{}", encode(title)),
        "Namava" => format!("https://www.namava.ir/search?query={}", encode(title)),
        "Netflix" => format!("https://www.netflix.com/search?q={}", encode(title)),
        "Prime Video" => format!("https://www.primevideo.com/search?query={}", encode(title)),
        "Google" => format!(
            "https://www.google.com/search?q={}",
            encode(&format!("{} {} watch online", title, year))
        ),
        "YouTube" => format!(
            "https://www.youtube.com/results?search_query={}",
            encode(&format!("{} {} full movie", title, year))
        ),
        _ => unreachable!("unknown platform"),
    }
}

/// Build the grouped link list for one movie, groups in display order.
pub fn streaming_links(title: &str, year: &str) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    let mut groups: Vec<(&'static str, Vec<(&'static str, String)>)> = Vec::new();
    for platform in PLATFORMS {
        let url = platform_url(platform.name, title, year);
        match groups.iter_mut().find(|(group, _)| *group == platform.group) {
            Some((_, entries)) => entries.push((platform.name, url)),
            None => groups.push((platform.group, vec![(platform.name, url)])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_url_encoded() {
        let groups = streaming_links("The Good, the Bad and the Ugly", "1966");
        let (_, iranian) = &groups[0];
        assert_eq!(
            iranian[0].1,
            "https://www.filimo.com/search/The%20Good%2C%20the%20Bad%20and%20the%20Ugly"
        );
    }

    #[test]
    fn search_links_include_the_year() {
        let groups = streaming_links("Inception", "2010");
        let (group, searchers) = groups.last().unwrap();
        assert_eq!(*group, "🔍 Google and YouTube");
        assert!(searchers[0].1.contains("Inception%202010%20watch%20online"));
        assert!(searchers[1].1.contains("Inception%202010%20full%20movie"));
    }

    #[test]
    fn all_three_groups_appear_in_order() {
        let groups = streaming_links("Heat", "1995");
        let names: Vec<_> = groups.iter().map(|(g, _)| *g).collect();
        assert_eq!(
            names,
            vec![
                "🇮🇷 Iranian platforms",
                "🌎 International platforms",
                "🔍 Google and YouTube"
            ]
        );
        assert_eq!(groups.iter().map(|(_, e)| e.len()).sum::<usize>(), 6);
    }
}
