//! Slide deck assembly
//!
//! A deck is built once from a container's pre-existing slide elements plus
//! any configured image URLs. It never grows or shrinks afterwards.

use tracing::{debug, error};

use crate::config::CarouselConfig;
use crate::error::{CarouselError, Result};

/// Where a slide's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideSource {
    /// A pre-existing element found in the container via the slide selector.
    Element { key: String },
    /// A slide synthesized from an image URL.
    Image { url: String, alt: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub index: usize,
    pub source: SlideSource,
}

impl Slide {
    /// Short human-readable label (element key or image URL).
    pub fn label(&self) -> &str {
        match &self.source {
            SlideSource::Element { key } => key,
            SlideSource::Image { url, .. } => url,
        }
    }
}

/// Host surface that owns the slide elements.
pub trait SlideContainer {
    /// Keys of the elements matching `selector`, in document order.
    fn query_slides(&self, selector: &str) -> Vec<String>;
}

/// An element inside a [`StaticContainer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerElement {
    pub key: String,
    pub classes: Vec<String>,
}

impl ContainerElement {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            classes: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Supports `*`, `.class` and bare keys.
    fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if selector == "*" {
            return true;
        }
        match selector.strip_prefix('.') {
            Some(class) => self.classes.iter().any(|c| c == class),
            None => self.key == selector,
        }
    }
}

/// In-memory container used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticContainer {
    elements: Vec<ContainerElement>,
}

impl StaticContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container whose elements all carry the class named by `selector`.
    pub fn with_slides<I, S>(selector: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let class = selector.trim().trim_start_matches('.').to_string();
        let elements = keys
            .into_iter()
            .map(|key| ContainerElement::new(key).with_class(class.clone()))
            .collect();
        Self { elements }
    }

    pub fn push(&mut self, element: ContainerElement) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl SlideContainer for StaticContainer {
    fn query_slides(&self, selector: &str) -> Vec<String> {
        self.elements
            .iter()
            .filter(|element| element.matches(selector))
            .map(|element| element.key.clone())
            .collect()
    }
}

/// Fixed-length, non-empty, ordered sequence of slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    /// Assemble the deck the way the carousel mounts: existing elements
    /// first, then one synthesized slide per configured image.
    pub fn assemble<C>(
        container: Option<&C>,
        config: &CarouselConfig,
    ) -> Result<Self>
    where
        C: SlideContainer + ?Sized,
    {
        let Some(container) = container else {
            error!("carousel container not found");
            return Err(CarouselError::ContainerNotFound);
        };

        let existing = container.query_slides(&config.slide_selector);
        debug!(
            selector = %config.slide_selector,
            count = existing.len(),
            "matched existing slide elements"
        );

        let elements = existing
            .into_iter()
            .map(|key| SlideSource::Element { key });
        let images = config.images.iter().cloned();

        Self::from_parts(elements, images)
    }

    /// Build a deck from element keys and image URLs directly.
    pub fn from_parts<E, I>(elements: E, images: I) -> Result<Self>
    where
        E: IntoIterator<Item = SlideSource>,
        I: IntoIterator<Item = String>,
    {
        let mut slides: Vec<Slide> = elements
            .into_iter()
            .enumerate()
            .map(|(index, source)| Slide { index, source })
            .collect();

        for url in images {
            let index = slides.len();
            slides.push(Slide {
                index,
                source: SlideSource::Image {
                    url,
                    alt: format!("Slide {}", index + 1),
                },
            });
        }

        if slides.is_empty() {
            error!("no slides or images provided for the carousel");
            return Err(CarouselError::NoSlidesProvided);
        }

        Ok(Self { slides })
    }

    /// Deck made only of image slides.
    pub fn from_images<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(std::iter::empty(), urls.into_iter().map(Into::into))
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_images(images: &[&str]) -> CarouselConfig {
        CarouselConfig {
            images: images.iter().map(|s| s.to_string()).collect(),
            ..CarouselConfig::default()
        }
    }

    #[test]
    fn missing_container_is_reported() {
        let config = config_with_images(&["a.jpg"]);
        let err = SlideDeck::assemble::<StaticContainer>(None, &config)
            .expect_err("container is required");
        assert_eq!(err, CarouselError::ContainerNotFound);
    }

    #[test]
    fn empty_container_without_images_is_reported() {
        let container = StaticContainer::new();
        let err =
            SlideDeck::assemble(Some(&container), &CarouselConfig::default())
                .expect_err("deck must not be empty");
        assert_eq!(err, CarouselError::NoSlidesProvided);
    }

    #[test]
    fn existing_elements_come_before_images() {
        let config = config_with_images(&["one.jpg", "two.jpg"]);
        let mut container =
            StaticContainer::with_slides(&config.slide_selector, ["intro"]);
        container.push(ContainerElement::new("footer").with_class("other"));

        let deck = SlideDeck::assemble(Some(&container), &config)
            .expect("deck assembles");

        assert_eq!(deck.len(), 3);
        assert_eq!(deck.get(0).map(Slide::label), Some("intro"));
        assert_eq!(
            deck.get(2).map(|s| s.source.clone()),
            Some(SlideSource::Image {
                url: "two.jpg".into(),
                alt: "Slide 3".into(),
            })
        );
        assert!(deck.iter().enumerate().all(|(i, s)| s.index == i));
    }

    #[test]
    fn selector_matching_supports_keys_and_wildcards() {
        let element = ContainerElement::new("hero").with_class("banner");
        assert!(element.matches("*"));
        assert!(element.matches(".banner"));
        assert!(element.matches("hero"));
        assert!(!element.matches(".hero"));
    }
}
