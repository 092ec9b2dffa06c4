pub mod stash_box_instances;
