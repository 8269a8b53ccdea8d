use crate::assets::TextureImage;

/// The shared texture sampled by the textured cube.
///
/// Starts as a 1x1 opaque black placeholder so the texture binding is always
/// valid; [`upload`](Self::upload) swaps in the decoded image. `generation`
/// changes on every swap so bind groups know to rebuild.
pub(super) struct CubeTexture {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    generation: u64,
}

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

impl CubeTexture {
    pub(super) fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let view = create_view(device, queue, "cubes placeholder texture", 1, 1, &[0, 0, 0, 255]);

        // Wrap/filter parameters are only applied once a real image arrives.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cubes placeholder sampler"),
            ..Default::default()
        });

        Self { view, sampler, generation: 0 }
    }

    /// Replaces the placeholder with `image`, sampled clamp-to-edge with linear filtering.
    pub(super) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, image: &TextureImage) {
        self.view = create_view(
            device,
            queue,
            "cubes texture",
            image.width(),
            image.height(),
            image.rgba(),
        );

        self.sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cubes texture sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        self.generation += 1;
    }

    pub(super) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub(super) fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub(super) fn generation(&self) -> u64 {
        self.generation
    }
}

/// Whether `image` can be uploaded as a 2D texture under `limits`.
pub(super) fn fits_limits(image: &TextureImage, limits: &wgpu::Limits) -> bool {
    let max = limits.max_texture_dimension_2d;
    image.width() <= max && image.height() <= max
}

fn create_view(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> TextureImage {
        TextureImage::from_rgba(width, height, vec![0; (width * height * 4) as usize]).unwrap()
    }

    #[test]
    fn image_at_limit_fits() {
        let limits = wgpu::Limits::default();
        let max = limits.max_texture_dimension_2d;
        assert!(fits_limits(&image(max, 1), &limits));
        assert!(fits_limits(&image(64, 64), &limits));
    }

    #[test]
    fn image_over_limit_is_rejected() {
        let limits = wgpu::Limits::default();
        let max = limits.max_texture_dimension_2d;
        assert!(!fits_limits(&image(max + 1, 1), &limits));
        assert!(!fits_limits(&image(1, max + 1), &limits));
    }
}
