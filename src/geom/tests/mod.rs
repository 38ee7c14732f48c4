mod test_boundary2d_basic;
mod test_cache_basic;
mod test_mesh_sanity;
