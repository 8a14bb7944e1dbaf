use ::image::RgbImage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Read-only pixel grid an image is encoded from.
pub trait FrameBuffer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn channel(&self, x: usize, y: usize, channel: Channel) -> u8;

    #[inline]
    fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        [
            self.channel(x, y, Channel::Red),
            self.channel(x, y, Channel::Green),
            self.channel(x, y, Channel::Blue),
        ]
    }
}

impl<F> FrameBuffer for &F
where
    F: FrameBuffer,
{
    #[inline]
    fn width(&self) -> usize {
        (&**self).width()
    }

    #[inline]
    fn height(&self) -> usize {
        (&**self).height()
    }

    #[inline]
    fn channel(&self, x: usize, y: usize, channel: Channel) -> u8 {
        (&**self).channel(x, y, channel)
    }

    #[inline]
    fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        (&**self).rgb(x, y)
    }
}

impl FrameBuffer for RgbImage {
    #[inline]
    fn width(&self) -> usize {
        RgbImage::width(self) as usize
    }

    #[inline]
    fn height(&self) -> usize {
        RgbImage::height(self) as usize
    }

    #[inline]
    fn channel(&self, x: usize, y: usize, channel: Channel) -> u8 {
        let pixel = self.get_pixel(x as u32, y as u32);
        match channel {
            Channel::Red => pixel.0[0],
            Channel::Green => pixel.0[1],
            Channel::Blue => pixel.0[2],
        }
    }

    #[inline]
    fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        self.get_pixel(x as u32, y as u32).0
    }
}

#[cfg(test)]
mod tests {
    use image::{
        Rgb,
        RgbImage,
    };

    use crate::image::{
        Channel,
        FrameBuffer,
    };

    #[test]
    fn rgb_image_channels() {
        let image = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 0xaa]));
        assert_eq!(FrameBuffer::width(&image), 3);
        assert_eq!(FrameBuffer::height(&image), 2);
        assert_eq!(image.channel(2, 1, Channel::Red), 2);
        assert_eq!(image.channel(2, 1, Channel::Green), 1);
        assert_eq!(image.channel(2, 1, Channel::Blue), 0xaa);
        assert_eq!((&image).rgb(1, 0), [1, 0, 0xaa]);
    }
}
