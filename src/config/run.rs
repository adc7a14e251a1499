pub struct RunParams {
    // Log a checkpoint line every this many steps.
    pub dstep_log: usize,
}
