use crate::content::format::{format_date, youtube_id};
use crate::domain::*;
use crate::images::ImageResolver;

/// Fills derived fields (image URLs, video ids) on a decoded document.
pub trait Resolve {
    fn resolve(&mut self, images: &ImageResolver);
}

fn display_date(raw: Option<&str>) -> Option<String> {
    raw.map(format_date).filter(|d| !d.is_empty())
}

impl Resolve for MinistryDynamic {
    fn resolve(&mut self, images: &ImageResolver) {
        self.image_url = images.image(self.image.as_ref()).width(800).auto_format().url();
        self.gallery_urls = self
            .gallery
            .iter()
            .map(|g| images.image(Some(g)).width(1200).auto_format().url())
            .collect();
        for event in &mut self.events {
            event.resolve(images);
        }
    }
}

impl Resolve for Testimonial {
    fn resolve(&mut self, images: &ImageResolver) {
        self.image_url = images.image(self.image.as_ref()).width(200).height(200).url();
    }
}

impl Resolve for HomeGroup {
    fn resolve(&mut self, images: &ImageResolver) {
        self.image_url = images.image(self.image.as_ref()).width(600).auto_format().url();
    }
}

impl Resolve for Sermon {
    fn resolve(&mut self, images: &ImageResolver) {
        self.image_url = images.image(self.image.as_ref()).width(800).auto_format().url();
        self.youtube_id = self.youtube_url.as_deref().and_then(youtube_id);
        self.display_date = display_date(self.date.as_deref());
    }
}

impl Resolve for BlogPost {
    fn resolve(&mut self, images: &ImageResolver) {
        self.image_url = images.image(self.main_image.as_ref()).width(1200).auto_format().url();
        self.author_image_url = self
            .author_image
            .as_ref()
            .map(|img| images.image(Some(img)).width(96).height(96).url());
        self.display_date = display_date(self.published_at.as_deref());
    }
}

impl Resolve for Mission {
    fn resolve(&mut self, images: &ImageResolver) {
        self.image_url = images.image(self.image.as_ref()).width(800).auto_format().url();
    }
}

impl Resolve for Event {
    fn resolve(&mut self, images: &ImageResolver) {
        self.image_url = images.image(self.image.as_ref()).width(800).auto_format().url();
    }
}

impl Resolve for LeadershipMember {
    fn resolve(&mut self, images: &ImageResolver) {
        self.image_url = images.image(self.image.as_ref()).width(400).height(400).fit("crop").url();
    }
}

impl Resolve for Category {
    fn resolve(&mut self, _images: &ImageResolver) {}
}
