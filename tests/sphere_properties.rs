//! Structural properties of the generated sphere over the whole slice range

use fisheye_core::mesh::INDICES_PER_QUAD;
use fisheye_core::{CoreError, LensProjection, SphereConfig, SphereMesh};
use proptest::prelude::*;

fn arb_projection() -> impl Strategy<Value = LensProjection> {
    prop_oneof![
        Just(LensProjection::Equidistant),
        Just(LensProjection::Stereographic),
        Just(LensProjection::Equisolid),
        Just(LensProjection::Orthographic),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn index_buffers_partition_all_quads(slices in 2usize..=180, buffers in 1usize..=16) {
        let mesh = SphereMesh::new(SphereConfig::default().with_slices(slices).with_index_buffers(buffers)).unwrap();
        let counts = mesh.index_counts();

        prop_assert_eq!(counts.len(), buffers);
        prop_assert_eq!(mesh.total_indices(), slices * slices * 6);
        prop_assert_eq!(counts.iter().sum::<usize>(), mesh.total_indices());
        for &count in &counts {
            prop_assert_eq!(count % INDICES_PER_QUAD, 0);
        }
        // leading buffers share one size, the last takes the remainder
        let (last, leading) = counts.split_last().unwrap();
        if let Some(&first) = leading.first() {
            prop_assert!(leading.iter().all(|&c| c == first));
            prop_assert!(*last >= first);
            prop_assert!(*last - first < buffers * INDICES_PER_QUAD);
        }
    }

    #[test]
    fn indices_stay_inside_vertex_buffer(slices in 2usize..=180, buffers in 1usize..=16) {
        let mesh = SphereMesh::new(SphereConfig::default().with_slices(slices).with_index_buffers(buffers)).unwrap();
        let vertex_count = (slices + 1) * (slices + 1);
        prop_assert_eq!(mesh.vertices().len(), vertex_count);
        for buffer in mesh.index_buffers() {
            prop_assert!(buffer.iter().all(|&i| (i as usize) < vertex_count));
        }
    }

    #[test]
    fn uvs_stay_in_their_lens_half(slices in 2usize..=64, projection in arb_projection()) {
        let mesh = SphereMesh::new(SphereConfig::default().with_slices(slices).with_projection(projection)).unwrap();
        let row_len = slices + 1;
        for (n, vertex) in mesh.vertices().iter().enumerate() {
            let j = n % row_len;
            let [u, v] = vertex.uv;
            prop_assert!((0.0..=1.0).contains(&v), "v {} at {}", v, n);
            if j < row_len / 2 {
                prop_assert!((0.0..=0.5).contains(&u), "left u {} at {}", u, n);
            } else {
                prop_assert!((0.5..=1.0).contains(&u), "right u {} at {}", u, n);
            }
        }
    }
}

#[test]
fn slice_limit_is_exact() {
    assert!(SphereMesh::new(SphereConfig::default().with_slices(180)).is_ok());
    let err = SphereMesh::new(SphereConfig::default().with_slices(181)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidConfiguration(_)));
}
