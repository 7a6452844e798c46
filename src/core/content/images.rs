// Header images for generated articles, picked from fixed Unsplash photo sets.

use rand::seq::SliceRandom;

const IMAGE_PARAMS: &str = "?w=1200&h=630&fit=crop&auto=format&q=85";

pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=1200&h=630&fit=crop&auto=format&q=85";

const AI_TECH: &[&str] = &[
    "https://images.unsplash.com/photo-1677442136019-21780ecad995",
    "https://images.unsplash.com/photo-1697577418970-95d99b5a55cf",
    "https://images.unsplash.com/photo-1718241905696-cb34c2c07bed",
    "https://images.unsplash.com/photo-1677756119517-756a188d2d94",
    "https://images.unsplash.com/photo-1535378917042-10a22c95931a",
    "https://images.unsplash.com/photo-1555255707-c07966088b7b",
];

const WORKSPACE: &[&str] = &[
    "https://images.unsplash.com/photo-1498050108023-c5249f4df085",
    "https://images.unsplash.com/photo-1521737604893-d14cc237f11d",
    "https://images.unsplash.com/photo-1518770660439-4636190af475",
    "https://images.unsplash.com/photo-1461749280684-dccba630e2f6",
    "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d",
];

const LEARNING: &[&str] = &[
    "https://images.unsplash.com/photo-1513258496099-48168024aec0",
    "https://images.unsplash.com/photo-1501504905252-473c47e087f8",
    "https://images.unsplash.com/photo-1522202176988-66273c2fd55f",
    "https://images.unsplash.com/photo-1481627834876-b7833e8f5570",
    "https://images.unsplash.com/photo-1456513080510-7bf3a84b82f8",
];

const CREATIVE: &[&str] = &[
    "https://images.unsplash.com/photo-1560421683-6856ea585c78",
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe",
    "https://images.unsplash.com/photo-1559028012-481c04fa702d",
    "https://images.unsplash.com/photo-1626447857058-2ba6a8868cb5",
    "https://images.unsplash.com/photo-1558618666-fcd25c85cd64",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    AiTech,
    Learning,
    Workspace,
    Creative,
}

impl ImageCategory {
    pub fn for_keyword(keyword: &str) -> Self {
        let keyword = keyword.to_lowercase();
        let has_any = |terms: &[&str]| terms.iter().any(|term| keyword.contains(term));

        if has_any(&["ai", "tech", "robot", "automat", "machine", "chatgpt", "gemini"]) {
            ImageCategory::AiTech
        } else if has_any(&["learn", "study", "education", "course", "student"]) {
            ImageCategory::Learning
        } else if has_any(&["work", "office", "business", "team", "product"]) {
            ImageCategory::Workspace
        } else {
            ImageCategory::Creative
        }
    }

    fn photos(self) -> &'static [&'static str] {
        match self {
            ImageCategory::AiTech => AI_TECH,
            ImageCategory::Learning => LEARNING,
            ImageCategory::Workspace => WORKSPACE,
            ImageCategory::Creative => CREATIVE,
        }
    }
}

/// A random photo from the category matching `keyword`, sized for a post header.
pub fn pick_image_url(keyword: &str) -> String {
    let photos = ImageCategory::for_keyword(keyword).photos();
    match photos.choose(&mut rand::thread_rng()) {
        Some(base) => format!("{}{}", base, IMAGE_PARAMS),
        None => FALLBACK_IMAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_picks_category() {
        assert_eq!(ImageCategory::for_keyword("AI"), ImageCategory::AiTech);
        assert_eq!(ImageCategory::for_keyword("Studying"), ImageCategory::Learning);
        assert_eq!(ImageCategory::for_keyword("Office"), ImageCategory::Workspace);
        assert_eq!(ImageCategory::for_keyword("Poetry"), ImageCategory::Creative);
    }

    #[test]
    fn picked_url_comes_from_category() {
        let url = pick_image_url("Learning");
        assert!(url.ends_with(IMAGE_PARAMS));
        assert!(LEARNING.iter().any(|base| url.starts_with(base)));
    }
}
